pub mod encounter;
pub mod player;
