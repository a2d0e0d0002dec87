pub mod decimal_ops;
pub mod number_coercion;
