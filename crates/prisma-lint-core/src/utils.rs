//! Utility modules for rule implementations.

pub mod allowance;
pub mod naming;
pub mod payload;
pub mod prisma;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{apply_allow_directives, check_allow_with_reason, AllowCheck};
#[doc(inline)]
pub use naming::{has_any_prefix, has_prefix, FunctionScope};
#[doc(inline)]
pub use payload::{field_state, write_payload, FieldState, Payload};
#[doc(inline)]
pub use prisma::{collect_prisma_calls, Operation, OperationKind, PrismaCall, PrismaCallSite};
