/*!
 * Syscall Tracing
 * Structured tracing for intercepted syscalls using the tracing crate
 *
 * Features:
 * - JSON or compact human-readable output
 * - One span per intercepted syscall, tagged with the emulator instance
 * - Status, fault and duration recorded when the span closes
 * - Slow-call warnings
 */

use std::time::{Duration, Instant};
use tracing::{debug, field, span, warn, Level, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TracingConfig;
use crate::core::types::{InstanceId, SyscallNumber};
use crate::syscalls::{EmulationFault, NtStatus};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `config.default_filter`. Returns `false` when a
/// subscriber was already installed, so repeated calls are harmless.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    }
}

/// Span covering one intercepted syscall
pub struct SyscallSpan {
    span: Span,
    start: Instant,
    number: SyscallNumber,
    name: String,
    slow_threshold: Duration,
}

impl SyscallSpan {
    pub fn new(
        instance: InstanceId,
        number: SyscallNumber,
        name: Option<&str>,
        slow_threshold: Duration,
    ) -> Self {
        let name = name.unwrap_or("<unknown>").to_string();
        let span = span!(
            Level::DEBUG,
            "syscall",
            instance = %instance,
            number = number,
            syscall = %name,
            status = field::Empty,
            fault = field::Empty,
            duration_us = field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            number,
            name,
            slow_threshold,
        }
    }

    /// Record the status written back to the guest
    pub fn record_status(&self, status: NtStatus) {
        self.span.record("status", field::display(status));
    }

    /// Record the fault that stopped emulation
    pub fn record_fault(&self, fault: &EmulationFault) {
        self.span.record("fault", field::display(fault));
    }

    pub fn record_outcome(&self, outcome: &Result<NtStatus, EmulationFault>) {
        match outcome {
            Ok(status) => self.record_status(*status),
            Err(fault) => {
                if let Some(status) = fault.guest_status() {
                    self.record_status(status);
                }
                self.record_fault(fault);
            }
        }
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for SyscallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration > self.slow_threshold {
            warn!(
                number = self.number,
                syscall = %self.name,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow syscall detected"
            );
        } else {
            debug!(
                number = self.number,
                syscall = %self.name,
                duration_us = duration.as_micros() as u64,
                "syscall completed"
            );
        }
    }
}
