//! Adapters turning typed Rust functions into arity-agnostic callables.
//!
//! Any `Fn(A1, .., An) -> Result<T, E>` with `Ai: DeserializeOwned`,
//! `T: Serialize` and `E: Display` can be exposed. Positional JSON arguments
//! are decoded one by one, missing trailing arguments are passed as `null`
//! so `Option` parameters behave like optional arguments.

use std::{fmt::Display, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::CallError;

/// A callable that executes an exposed function
///
/// # Arguments
/// * Input: `Vec<serde_json::Value>` - positional arguments
/// * Output: `Result<serde_json::Value, CallError>` - return value or failure
pub type CallableFn = Arc<dyn Fn(Vec<Value>) -> Result<Value, CallError> + Send + Sync>;

/// Conversion of a function return value into a call result
pub trait IntoCallResult {
    /// # Errors
    ///
    /// Returns [`CallError::Call`] for failures of the function and
    /// [`CallError::Encode`] if the value is not representable as JSON
    fn into_call_result(self) -> Result<Value, CallError>;
}

impl<T, E> IntoCallResult for Result<T, E>
where
    T: Serialize,
    E: Display,
{
    fn into_call_result(self) -> Result<Value, CallError> {
        match self {
            Ok(value) => {
                serde_json::to_value(value).map_err(|e| CallError::Encode(e.to_string()))
            }
            Err(e) => Err(CallError::Call(format!("{e:#}"))),
        }
    }
}

/// Functions that can be exposed to the front end, `Args` is the tuple of
/// parameter types
pub trait IntoCallable<Args>: Send + Sync + Sized + 'static {
    fn into_callable(self) -> CallableFn;
}

/// Wraps an untyped function receiving the raw positional arguments
pub fn raw_callable<F>(f: F) -> CallableFn
where
    F: Fn(Vec<Value>) -> Result<Value, CallError> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn decode_arg<T: DeserializeOwned>(
    args: &mut std::vec::IntoIter<Value>,
    position: usize,
) -> Result<T, CallError> {
    let value = args.next().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| CallError::Decode(format!("argument {position}: {e}")))
}

fn check_arity(args: &[Value], expected: usize) -> Result<(), CallError> {
    if args.len() > expected {
        return Err(CallError::Decode(format!(
            "takes {expected} positional arguments but {} were given",
            args.len()
        )));
    }
    Ok(())
}

macro_rules! impl_into_callable {
    ($count:expr $(, $ty:ident)*) => {
        impl<Func, Res, $($ty,)*> IntoCallable<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Res + Send + Sync + 'static,
            Res: IntoCallResult,
            $($ty: DeserializeOwned,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_callable(self) -> CallableFn {
                Arc::new(move |args: Vec<Value>| {
                    check_arity(&args, $count)?;
                    let mut args = args.into_iter();
                    let mut position = 0;
                    $(
                        position += 1;
                        let $ty: $ty = decode_arg(&mut args, position)?;
                    )*
                    (self)($($ty),*).into_call_result()
                })
            }
        }
    };
}

impl_into_callable!(0);
impl_into_callable!(1, A1);
impl_into_callable!(2, A1, A2);
impl_into_callable!(3, A1, A2, A3);
impl_into_callable!(4, A1, A2, A3, A4);
impl_into_callable!(5, A1, A2, A3, A4, A5);
impl_into_callable!(6, A1, A2, A3, A4, A5, A6);
