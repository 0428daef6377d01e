pub mod cycle;
