use centerbox::{
    CenterBoxError, ImageInput, OverlapMetric, Pipeline, PipelineConfig, PredictionGrid,
};

/// A known box to inverse-encode into a prediction grid.
#[derive(Clone, Copy)]
struct Scene {
    category: usize,
    score: f32,
    center: (f32, f32),
    size: (f32, f32),
}

/// Writes boxes into a flat (H, W, C) buffer by inverse-encoding each box
/// into its anchor cell: fractional center as offsets, extent normalized by
/// the grid resolution.
fn encode(width: usize, height: usize, categories: usize, scenes: &[Scene]) -> Vec<f32> {
    let channels = categories + 4;
    let mut data = vec![0.0f32; width * height * channels];
    for scene in scenes {
        let (x_c, y_c) = scene.center;
        let col = x_c.floor() as usize;
        let row = y_c.floor() as usize;
        let base = (row * width + col) * channels;
        data[base + scene.category] = scene.score;
        data[base + categories] = x_c - col as f32;
        data[base + categories + 1] = y_c - row as f32;
        data[base + categories + 2] = scene.size.0 / width as f32;
        data[base + categories + 3] = scene.size.1 / height as f32;
    }
    data
}

fn single_class_pipeline(grid: usize) -> Pipeline {
    Pipeline::with_config(PipelineConfig {
        grid_width: grid,
        grid_height: grid,
        ..PipelineConfig::default()
    })
}

#[test]
fn known_boxes_round_trip_through_the_pipeline() {
    let scenes = [
        Scene {
            category: 0,
            score: 0.9,
            center: (4.5, 3.5),
            size: (3.0, 2.0),
        },
        Scene {
            category: 0,
            score: 0.8,
            center: (11.25, 10.5),
            size: (2.0, 3.0),
        },
        Scene {
            category: 0,
            score: 0.7,
            center: (12.5, 3.25),
            size: (2.5, 2.5),
        },
    ];
    let data = encode(16, 16, 1, &scenes);
    let grid = PredictionGrid::from_slice(&data, 16, 16, 5).unwrap();

    // Identity scale keeps grid units, so corners compare directly.
    let detections = single_class_pipeline(16)
        .process_image(&grid, (16, 16), "img_000")
        .unwrap();

    assert_eq!(detections.len(), scenes.len());
    for (detection, scene) in detections.iter().zip(scenes.iter()) {
        let (x_c, y_c) = scene.center;
        let (w, h) = scene.size;
        assert_eq!(detection.image_id, "img_000");
        assert!((detection.score - scene.score).abs() < 1e-6);
        assert!((detection.y_min - (y_c - h / 2.0)).abs() < 1e-5);
        assert!((detection.x_min - (x_c - w / 2.0)).abs() < 1e-5);
        assert!((detection.y_max - (y_c + h / 2.0)).abs() < 1e-5);
        assert!((detection.x_max - (x_c + w / 2.0)).abs() < 1e-5);
    }
}

#[test]
fn detections_rescale_to_image_pixels() {
    let scenes = [Scene {
        category: 0,
        score: 0.9,
        center: (8.5, 8.5),
        size: (4.0, 2.0),
    }];
    let data = encode(16, 16, 1, &scenes);
    let grid = PredictionGrid::from_slice(&data, 16, 16, 5).unwrap();

    // 16x16 grid into a 160x64 image: x scales by 10, y by 4.
    let detections = single_class_pipeline(16)
        .process_image(&grid, (160, 64), "img_001")
        .unwrap();

    assert_eq!(detections.len(), 1);
    let d = &detections[0];
    assert!((d.x_min - 65.0).abs() < 1e-4);
    assert!((d.x_max - 105.0).abs() < 1e-4);
    assert!((d.y_min - 30.0).abs() < 1e-4);
    assert!((d.y_max - 38.0).abs() < 1e-4);
}

#[test]
fn overlapping_candidates_collapse_to_the_strongest() {
    let scenes = [
        Scene {
            category: 0,
            score: 0.9,
            center: (8.5, 8.5),
            size: (4.0, 4.0),
        },
        Scene {
            category: 0,
            score: 0.6,
            center: (9.5, 8.5),
            size: (4.0, 4.0),
        },
    ];
    let data = encode(16, 16, 1, &scenes);
    let grid = PredictionGrid::from_slice(&data, 16, 16, 5).unwrap();

    let detections = single_class_pipeline(16)
        .process_image(&grid, (16, 16), "img_002")
        .unwrap();

    assert_eq!(detections.len(), 1);
    assert!((detections[0].score - 0.9).abs() < 1e-6);
}

#[test]
fn shared_top_edges_collapse_across_the_grid() {
    // Far apart horizontally, identical vertical extent: suppression keeps
    // both, the duplicate-origin collapse drops the weaker.
    let scenes = [
        Scene {
            category: 0,
            score: 0.9,
            center: (3.5, 8.5),
            size: (2.0, 2.0),
        },
        Scene {
            category: 0,
            score: 0.7,
            center: (12.5, 8.5),
            size: (2.0, 2.0),
        },
    ];
    let data = encode(16, 16, 1, &scenes);
    let grid = PredictionGrid::from_slice(&data, 16, 16, 5).unwrap();

    let detections = single_class_pipeline(16)
        .process_image(&grid, (16, 16), "img_003")
        .unwrap();

    assert_eq!(detections.len(), 1);
    assert!((detections[0].score - 0.9).abs() < 1e-6);
}

#[test]
fn categories_suppress_independently_and_merge_by_score() {
    // Heavily overlapping boxes in different categories: per-category
    // suppression keeps both; the merged list is globally sorted by score.
    // Anchor cells and top edges differ so neither the shared regression
    // channels nor the collapse pass interfere.
    let scenes = [
        Scene {
            category: 0,
            score: 0.7,
            center: (8.5, 8.5),
            size: (4.0, 4.0),
        },
        Scene {
            category: 1,
            score: 0.9,
            center: (8.25, 9.25),
            size: (4.0, 5.0),
        },
    ];
    let data = encode(16, 16, 2, &scenes);
    let grid = PredictionGrid::from_slice(&data, 16, 16, 6).unwrap();

    let detections = single_class_pipeline(16)
        .process_image(&grid, (16, 16), "img_004")
        .unwrap();

    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].category, 1);
    assert!((detections[0].score - 0.9).abs() < 1e-6);
    assert_eq!(detections[1].category, 0);
}

#[test]
fn union_overlap_is_available_end_to_end() {
    let scenes = [
        Scene {
            category: 0,
            score: 0.9,
            center: (8.5, 8.5),
            size: (4.0, 4.0),
        },
        Scene {
            category: 0,
            score: 0.6,
            center: (10.5, 8.5),
            size: (4.0, 4.0),
        },
    ];
    let data = encode(16, 16, 1, &scenes);
    let grid = PredictionGrid::from_slice(&data, 16, 16, 5).unwrap();

    // Intersection 8 over kept area 16 suppresses with the default metric;
    // true IoU 8/24 = 0.33 stays below the 0.4 threshold.
    let kept_fraction = single_class_pipeline(16)
        .process_image(&grid, (16, 16), "img_005")
        .unwrap();
    assert_eq!(kept_fraction.len(), 1);

    let union = Pipeline::with_config(PipelineConfig {
        grid_width: 16,
        grid_height: 16,
        overlap: OverlapMetric::Union,
        ..PipelineConfig::default()
    })
    .process_image(&grid, (16, 16), "img_005")
    .unwrap();
    assert_eq!(union.len(), 2);
}

#[test]
fn silent_grid_produces_no_detections() {
    let data = vec![0.0f32; 16 * 16 * 5];
    let grid = PredictionGrid::from_slice(&data, 16, 16, 5).unwrap();

    let detections = single_class_pipeline(16)
        .process_image(&grid, (640, 480), "img_006")
        .unwrap();
    assert!(detections.is_empty());
}

#[test]
fn mismatched_grid_shape_fails_fast() {
    let data = vec![0.0f32; 8 * 8 * 5];
    let grid = PredictionGrid::from_slice(&data, 8, 8, 5).unwrap();

    let err = single_class_pipeline(16)
        .process_image(&grid, (640, 480), "img_007")
        .err()
        .unwrap();
    assert_eq!(
        err,
        CenterBoxError::GridSizeMismatch {
            expected_width: 16,
            expected_height: 16,
            width: 8,
            height: 8,
        }
    );
}

#[test]
fn batch_processing_matches_per_image_calls() {
    let scenes_a = [Scene {
        category: 0,
        score: 0.9,
        center: (4.5, 4.5),
        size: (3.0, 3.0),
    }];
    let scenes_b = [Scene {
        category: 0,
        score: 0.8,
        center: (10.5, 10.5),
        size: (2.0, 2.0),
    }];
    let data_a = encode(16, 16, 1, &scenes_a);
    let data_b = encode(16, 16, 1, &scenes_b);
    let grid_a = PredictionGrid::from_slice(&data_a, 16, 16, 5).unwrap();
    let grid_b = PredictionGrid::from_slice(&data_b, 16, 16, 5).unwrap();

    let pipeline = single_class_pipeline(16);
    let inputs = [
        ImageInput {
            grid: grid_a,
            image_size: (320, 240),
            image_id: "img_a",
        },
        ImageInput {
            grid: grid_b,
            image_size: (64, 64),
            image_id: "img_b",
        },
    ];

    let batch = pipeline.process_batch(&inputs);
    assert_eq!(batch.len(), 2);
    for (input, result) in inputs.iter().zip(batch.iter()) {
        let single = pipeline
            .process_image(&input.grid, input.image_size, input.image_id)
            .unwrap();
        assert_eq!(result.as_ref().unwrap(), &single);
    }
}
