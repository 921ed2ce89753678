pub mod dataset_writer;
pub mod random_split_assigner;
pub mod sequential_split_assigner;
pub mod split_assigner_factory;
