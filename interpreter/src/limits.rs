/// Method calls allowed to be active at once before execution fails with a recursion error.
/// Every level costs several native frames, this keeps the deepest run well inside a 2 MiB
/// thread stack in unoptimized builds.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
