pub mod bool3s;
pub mod gate;
pub mod gate_type;
pub mod source;
