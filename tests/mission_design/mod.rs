mod estimator;
mod pipeline;
mod snapshot;
