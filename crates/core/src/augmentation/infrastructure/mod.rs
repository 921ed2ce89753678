pub mod random_perturbation_generator;
