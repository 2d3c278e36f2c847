pub mod replay;
pub mod split;
