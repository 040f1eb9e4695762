/*!
 * Monitoring
 * Subscriber setup and per-syscall tracing spans
 */

mod tracer;

pub use tracer::{init_tracing, SyscallSpan};
