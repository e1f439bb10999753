// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the kvetch crates.

/// `Display` for an enum whose variants each print as a fixed string.
///
/// Variants with data are written with `(..)` or `{ .. }`:
///
/// ```ignore
/// crate::simple_display! {
///     Action {
///         None => "none",
///         NotifyClaimant { .. } => "notify_claimant",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty {
        $( $variant:ident $(( $($tuple:tt)* ))? $({ $($fields:tt)* })? => $str:expr ),+ $(,)?
    }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let text = match self {
                    $( Self::$variant $(( $($tuple)* ))? $({ $($fields)* })? => $str, )+
                };
                f.write_str(text)
            }
        }
    };
}

/// Test-only builder for a fact struct, plus `Target::builder()`.
///
/// Every field of the target must be listed with its test default.
/// `into` setters accept `impl Into<T>`, `set` setters take `T`, and
/// `option` fields are `Option<T>` whose setters wrap the value in `Some`.
/// Nothing is generated outside `test` or the `test-support` feature.
///
/// ```ignore
/// crate::builder! {
///     pub struct JobFactsBuilder => JobFacts {
///         into { name: String = "acme/widget" }
///         set { builds: Vec<u64> = Vec::new() }
///         option { last_failed_build: u64 = None }
///     }
/// }
///
/// let job = JobFacts::builder().last_failed_build(7u64).build();
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            $(into {
                $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)?
            })?
            $(set {
                $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)?
            })?
            $(option {
                $( $opt_field:ident : $opt_ty:ty = $opt_default:expr ),* $(,)?
            })?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder($target);

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self($target {
                    $($( $into_field: $into_default.into(), )*)?
                    $($( $set_field: $set_default, )*)?
                    $($( $opt_field: $opt_default, )*)?
                })
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $($(
                pub fn $into_field(mut self, value: impl Into<$into_ty>) -> Self {
                    self.0.$into_field = value.into();
                    self
                }
            )*)?
            $($(
                pub fn $set_field(mut self, value: $set_ty) -> Self {
                    self.0.$set_field = value;
                    self
                }
            )*)?
            $($(
                pub fn $opt_field(mut self, value: impl Into<$opt_ty>) -> Self {
                    self.0.$opt_field = Some(value.into());
                    self
                }
            )*)?

            pub fn build(self) -> $target {
                self.0
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// Chainable setters for config structs, expanded inside their `impl`.
///
/// ```ignore
/// impl EscalationConfig {
///     kv_core::setters! {
///         into { build_monitor: String }
///         set { throttle_hours: u64 }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (
        $(into { $( $into_field:ident : $into_ty:ty ),* $(,)? })?
        $(set { $( $set_field:ident : $set_ty:ty ),* $(,)? })?
    ) => {
        $($(
            pub fn $into_field(mut self, value: impl Into<$into_ty>) -> Self {
                self.$into_field = value.into();
                self
            }
        )*)?
        $($(
            pub fn $set_field(mut self, value: $set_ty) -> Self {
                self.$set_field = value;
                self
            }
        )*)?
    };
}
