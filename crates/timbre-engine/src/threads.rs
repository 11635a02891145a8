/// Math-library thread budget for the synthesis worker
///
/// Leaves two cores for the serving layer so request handling stays
/// responsive while the model is busy, with a floor of one.
pub fn worker_threads() -> usize {
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    cores.saturating_sub(2).max(1)
}
