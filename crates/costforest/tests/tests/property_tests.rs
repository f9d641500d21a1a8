#[path = "property/cost_matrix_diagonal.rs"]
mod cost_matrix_diagonal;

#[path = "property/window_accounting.rs"]
mod window_accounting;

#[path = "property/vote_shape.rs"]
mod vote_shape;

#[path = "property/oza_neutral_cost.rs"]
mod oza_neutral_cost;

#[path = "property/session_reset.rs"]
mod session_reset;
