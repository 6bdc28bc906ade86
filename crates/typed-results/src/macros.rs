// crates/typed-results/src/macros.rs
// Variant macro. Expands to a zero-sized marker implementing `Variant` and a
// `TypedResult` alias named after the response, so a new status code costs
// one invocation:
//
//     declare_variant!(
//         /// 410 Gone.
//         GoneStatus, Gone, StatusCode::GONE, "my_app.result.Gone"
//     );
//
// Add `coercion: CoercionPolicy::Passthrough` as a trailing argument to skip
// problem defaults for that variant.
#[macro_export]
macro_rules! declare_variant {
    (
        $(#[$meta:meta])*
        $marker:ident,
        $alias:ident,
        $status:expr,
        $category:expr
        $(, coercion: $policy:expr)?
        $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $marker;

        impl $crate::Variant for $marker {
            const STATUS: $crate::StatusCode = $status;
            const LOG_CATEGORY: &'static str = $category;
            $(const COERCION: $crate::CoercionPolicy = $policy;)?
        }

        $(#[$meta])*
        pub type $alias<T> = $crate::TypedResult<T, $marker>;
    };
}
