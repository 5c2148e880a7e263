//! Native stack growth for the recursive evaluator.
//!
//! `max_depth` bounds how deep a program may nest, but a single HOL call
//! costs several Rust frames, so the depth limit alone does not fit every
//! thread's stack. Each `eval_expr` step goes through
//! [`ensure_sufficient_stack`], which moves evaluation onto a freshly
//! allocated segment when the current one runs low.

/// Minimum stack space to keep available (128KB red zone).
const RED_ZONE: usize = 128 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
