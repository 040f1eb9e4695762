/*!
 * Syscall Handlers
 * One function per NT syscall, grouped by object class
 */

pub mod event;
pub mod object;
pub mod registry;
