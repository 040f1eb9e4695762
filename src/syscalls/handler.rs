/*!
 * Syscall Handler Table
 * Handler descriptors keyed by syscall name
 *
 * A handler is a plain function taking the syscall context followed by its
 * typed parameters. Its arity and argument marshaling come from the
 * function type, so registering a handler needs no per-syscall glue.
 */

use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::args::SyscallArg;
use super::context::SyscallContext;
use super::handlers;
use super::types::SyscallOutcome;

/// Most arguments any registered handler takes
pub const MAX_ARITY: usize = 8;

/// A function usable as a syscall handler, for parameter tuple `Args`
pub trait SyscallHandlerFn<Args>: Send + Sync + 'static {
    /// Number of argument slots the handler consumes
    const ARITY: usize;

    /// Extract typed arguments from `raw` and run the handler
    fn call(&self, ctx: &mut SyscallContext<'_>, raw: &[u64]) -> SyscallOutcome;
}

macro_rules! impl_handler_fn {
    ($arity:expr; $($ty:ident => $var:ident),*) => {
        impl<F, $($ty,)*> SyscallHandlerFn<($($ty,)*)> for F
        where
            F: Fn(&mut SyscallContext<'_>, $($ty),*) -> SyscallOutcome + Send + Sync + 'static,
            $($ty: SyscallArg,)*
        {
            const ARITY: usize = $arity;

            #[allow(unused_variables, unused_mut)]
            fn call(&self, ctx: &mut SyscallContext<'_>, raw: &[u64]) -> SyscallOutcome {
                let mut slots = raw.iter().copied();
                $(
                    let $var = <$ty as SyscallArg>::extract(&*ctx.cpu, slots.next().unwrap_or(0))?;
                )*
                (self)(ctx, $($var),*)
            }
        }
    };
}

impl_handler_fn!(0;);
impl_handler_fn!(1; A1 => a1);
impl_handler_fn!(2; A1 => a1, A2 => a2);
impl_handler_fn!(3; A1 => a1, A2 => a2, A3 => a3);
impl_handler_fn!(4; A1 => a1, A2 => a2, A3 => a3, A4 => a4);
impl_handler_fn!(5; A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5);
impl_handler_fn!(6; A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6);
impl_handler_fn!(7; A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6, A7 => a7);
impl_handler_fn!(8; A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6, A7 => a7, A8 => a8);

type InvokeFn = dyn Fn(&mut SyscallContext<'_>, &[u64]) -> SyscallOutcome + Send + Sync;

/// A registered handler with its declared arity
pub struct HandlerDescriptor {
    name: &'static str,
    arity: usize,
    invoke: Box<InvokeFn>,
}

impl HandlerDescriptor {
    pub fn new<Args: 'static, H>(name: &'static str, handler: H) -> Self
    where
        H: SyscallHandlerFn<Args>,
    {
        Self {
            name,
            arity: H::ARITY,
            invoke: Box::new(move |ctx: &mut SyscallContext<'_>, raw: &[u64]| handler.call(ctx, raw)),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Run with exactly `arity` raw argument slots
    #[inline]
    pub fn invoke(&self, ctx: &mut SyscallContext<'_>, raw: &[u64]) -> SyscallOutcome {
        (self.invoke)(ctx, raw)
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Name-keyed handler table
#[derive(Clone, Default)]
pub struct SyscallTable {
    handlers: Arc<HashMap<&'static str, Arc<HandlerDescriptor>, RandomState>>,
}

impl SyscallTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Every handler this crate implements
    pub fn standard() -> Self {
        Self::new()
            .register("NtOpenKey", handlers::registry::nt_open_key)
            .register("NtOpenKeyEx", handlers::registry::nt_open_key_ex)
            .register("NtQueryKey", handlers::registry::nt_query_key)
            .register("NtQueryValueKey", handlers::registry::nt_query_value_key)
            .register("NtCreateKey", handlers::registry::nt_create_key)
            .register("NtSetInformationKey", handlers::registry::nt_set_information_key)
            .register("NtEnumerateKey", handlers::registry::nt_enumerate_key)
            .register("NtNotifyChangeKey", handlers::registry::nt_notify_change_key)
            .register("NtClose", handlers::object::nt_close)
            .register("NtCreateEvent", handlers::event::nt_create_event)
            .register("NtSetEvent", handlers::event::nt_set_event)
            .register("NtResetEvent", handlers::event::nt_reset_event)
            .register("NtClearEvent", handlers::event::nt_clear_event)
    }

    /// Register a handler under `name`, replacing any previous one
    pub fn register<Args: 'static, H>(mut self, name: &'static str, handler: H) -> Self
    where
        H: SyscallHandlerFn<Args>,
    {
        debug_assert!(H::ARITY <= MAX_ARITY);
        let handlers = Arc::make_mut(&mut self.handlers);
        handlers.insert(name, Arc::new(HandlerDescriptor::new(name, handler)));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<HandlerDescriptor>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Get the number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}

impl fmt::Debug for SyscallTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyscallTable")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
