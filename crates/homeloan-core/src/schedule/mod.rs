pub mod amortization;
pub mod payoff;
