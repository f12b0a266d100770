// Domain Layer - what one merge invocation asks for and what it returns

pub mod request;
pub mod result;

pub use request::InvocationRequest;
pub use result::InvocationResult;
