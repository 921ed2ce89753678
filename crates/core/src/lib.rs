pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod video_metadata;
}

pub mod video {
    pub mod domain {
        pub mod image_writer;
        pub mod video_reader;
    }
    pub mod infrastructure;
}

pub mod catalog {
    pub mod domain {
        pub mod group_key;
        pub mod video_catalog;
        pub mod video_handle;
    }
    pub mod infrastructure;
}

pub mod sampling {
    pub mod domain {
        pub mod edge_trim;
        pub mod frame_count_aggregator;
        pub mod group_aggregate;
        pub mod sample_index_planner;
        pub mod sample_target;
        pub mod sampled_frames;
    }
}

pub mod augmentation {
    pub mod domain {
        pub mod affine_warp;
        pub mod frame_perturber;
    }
    pub mod infrastructure;
}

pub mod dataset {
    pub mod domain {
        pub mod produced_frame;
        pub mod split;
        pub mod split_assigner;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod build_dataset_use_case;
    pub mod dataset_summary;
    pub mod pipeline_logger;
}
