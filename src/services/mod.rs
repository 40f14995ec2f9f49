pub mod analytic_metrics;
pub mod arrival_generator;
pub mod chi_squared;
pub mod comparison_types;
pub mod convergence;
pub mod customer_process;
pub mod delay_sampler;
pub mod empirical_metrics;
pub mod event_clock;
pub mod parameters_yaml;
pub mod probability_plot;
pub mod queueing_simulation;
pub mod server_pool;
pub mod statistics;
pub mod steady_state;
