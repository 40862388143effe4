mod stage;
mod stepper;
