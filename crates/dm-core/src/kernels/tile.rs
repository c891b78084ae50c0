/// Assumed level-1 data cache capacity.
const L1_CACHE_BYTES: usize = 32 * 1024;

/// Upper bound on the tile edge regardless of cache arithmetic.
const MAX_TILE: usize = 256;

/// Derives a cache-friendly tile edge length for blocked kernels.
///
/// Splits the assumed L1 capacity across the three live tiles (an a-block,
/// a b-block, and a c-block), takes the square root to get an edge length,
/// rounds down to the assumed vector width (8 lanes for 8-byte elements,
/// 16 otherwise), caps at [`MAX_TILE`], and clamps to each nonzero problem
/// dimension. A dimension of 0 means "no constraint from this axis". A
/// collapsed result is forced back up to the vector width.
///
/// Advisory only: callers override it by passing an explicit nonzero tile
/// to the kernels.
pub fn optimal_tile<T>(m: usize, n: usize, k: usize) -> usize {
    let elem = std::mem::size_of::<T>().max(1);
    let vector_width = if elem == 8 { 8 } else { 16 };
    let per_tile = L1_CACHE_BYTES / (3 * elem);
    let mut tile = (per_tile as f64).sqrt() as usize;
    tile -= tile % vector_width;
    tile = tile.min(MAX_TILE);
    for dim in [m, n, k] {
        if dim != 0 {
            tile = tile.min(dim);
        }
    }
    if tile == 0 {
        tile = vector_width;
    }
    tile
}
