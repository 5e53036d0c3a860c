use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ndscan::config::{CorpusKind, DbscanConfig, Metric, Precision};
use ndscan::space::dense::DenseCorpus;
use ndscan::space::metrics::CosineAbove;
use ndscan::space::sparse::SparseCorpus;
use ndscan::{dbscan, Dbscan, Error, Float, UNASSIGNED};

const BLOB_CENTERS: [(f64, f64); 3] = [(1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];
const BLOB_SIZE: usize = 250;
const BLOB_RADIUS: f64 = 0.3;

/// Uniform points in a disk around each center, blob by blob.
fn make_blobs<T: Float>(seed: u64) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(BLOB_CENTERS.len() * BLOB_SIZE * 2);
    for (cx, cy) in BLOB_CENTERS.iter() {
        for _ in 0..BLOB_SIZE {
            let r = BLOB_RADIUS * rng.gen_range(0.0f64..1.0).sqrt();
            let theta = rng.gen_range(0.0..std::f64::consts::TAU);
            out.push(T::from_f64_lossy(cx + r * theta.cos()));
            out.push(T::from_f64_lossy(cy + r * theta.sin()));
        }
    }
    out
}

fn check_blobs<T: Float>() {
    let data = make_blobs::<T>(42);
    let rows = BLOB_CENTERS.len() * BLOB_SIZE;

    for (kind, metric, eps) in [
        (CorpusKind::Dense, Metric::Euclidean, 0.3),
        (CorpusKind::Sparse, Metric::Euclidean, 0.3),
        (CorpusKind::Sparse, Metric::Cosine, 0.99),
    ] {
        let engine = Dbscan::from_buffer(&data, rows, 2, kind, metric).unwrap();
        let out = engine.run(T::from_f64_lossy(eps), 10).unwrap();

        assert_eq!(out.len(), rows);
        assert_eq!(out.noise.len(), rows);
        assert_eq!(out.num_clusters, 3, "{} {}", kind, metric);

        let mut seen = HashSet::new();
        for blob in 0..BLOB_CENTERS.len() {
            let blob_labels: HashSet<i64> = out.labels[blob * BLOB_SIZE..(blob + 1) * BLOB_SIZE]
                .iter()
                .copied()
                .filter(|l| *l != UNASSIGNED)
                .collect();
            assert_eq!(blob_labels.len(), 1, "{} {} blob {}", kind, metric, blob);
            let label = *blob_labels.iter().next().unwrap();
            assert!(seen.insert(label), "two blobs share cluster {}", label);
        }

        if metric == Metric::Euclidean {
            // Every point has the bulk of its own disk within eps.
            assert_eq!(out.num_assigned(), rows);
            assert_eq!(out.num_noise(), 0);
            assert_eq!(out.cluster_sizes(), vec![BLOB_SIZE; 3]);
        }
    }
}

#[test]
fn test_three_blobs_single_precision() {
    check_blobs::<f32>();
}

#[test]
fn test_three_blobs_double_precision() {
    check_blobs::<f64>();
}

#[test]
fn test_triangle_with_outlier() {
    let points = [0.0f64, 0.0, 0.0, 0.1, 0.1, 0.0, 10.0, 10.0];
    let corpus = DenseCorpus::new(&points, 4, 2).unwrap();
    let out = dbscan(&corpus, 0.5, 2).unwrap();
    assert_eq!(out.labels, vec![0, 0, 0, -1]);
    assert_eq!(out.noise, vec![false, false, false, true]);
    assert_eq!(out.num_clusters, 1);
}

#[test]
fn test_identical_points() {
    let rows = 6;
    let points = vec![1.5f32; rows * 3];
    let corpus = DenseCorpus::new(&points, rows, 3).unwrap();

    // Each row has rows - 1 neighbors.
    let out = dbscan(&corpus, 0.1, rows - 1).unwrap();
    assert_eq!(out.labels, vec![0; rows]);
    assert_eq!(out.num_noise(), 0);
    assert_eq!(out.num_clusters, 1);

    let out = dbscan(&corpus, 0.1, rows).unwrap();
    assert_eq!(out.labels, vec![UNASSIGNED; rows]);
    assert_eq!(out.noise, vec![true; rows]);
    assert_eq!(out.num_clusters, 0);
}

#[test]
fn test_min_pts_above_row_count() {
    let points = [0.0f64, 0.0, 0.0, 0.1, 0.1, 0.0, 10.0, 10.0];
    let engine = Dbscan::from_buffer(&points, 4, 2, CorpusKind::Dense, Metric::Euclidean).unwrap();
    let out = engine.run(100.0, 5).unwrap();
    assert_eq!(out.labels, vec![UNASSIGNED; 4]);
    assert_eq!(out.noise, vec![true; 4]);
    assert_eq!(out.num_clusters, 0);
}

#[test]
fn test_cosine_zero_rows_are_noise() {
    // Rows 0..3 point the same way, rows 3 and 4 are all zero.
    let points = [
        1.0f64, 2.0, 0.0, //
        2.0, 4.0, 0.0, //
        3.0, 6.0, 0.1, //
        0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0,
    ];
    let corpus = SparseCorpus::<f64, CosineAbove<f64>>::from_dense(&points, 5, 3).unwrap();
    let out = dbscan(&corpus, 0.9, 1).unwrap();
    assert_eq!(out.labels, vec![0, 0, 0, UNASSIGNED, UNASSIGNED]);
    assert_eq!(out.noise, vec![false, false, false, true, true]);

    // A negative threshold does not make zero rows similar to anything.
    let out = dbscan(&corpus, -0.5, 1).unwrap();
    assert_eq!(&out.labels[3..], &[UNASSIGNED, UNASSIGNED]);
    assert_eq!(&out.noise[3..], &[true, true]);
}

#[test]
fn test_noise_flag_survives_late_assignment() {
    // Row 0 is visited first and only has row 1 within eps, so it is flagged
    // noise. Row 1 is core and later pulls row 0 into its cluster.
    let points = [1.0f64, 1.0, 1.4, 1.0, 1.5, 1.0, 1.6, 1.0];
    let corpus = DenseCorpus::new(&points, 4, 2).unwrap();
    let out = dbscan(&corpus, 0.45, 2).unwrap();
    assert_eq!(out.labels, vec![0, 0, 0, 0]);
    assert_eq!(out.noise, vec![true, false, false, false]);
    assert_eq!(out.num_noise(), 1);
    assert_eq!(out.num_assigned(), 4);
}

#[test]
fn test_later_cluster_absorbs_earlier_noise_row() {
    // Row 0 is noise as a seed, cluster 0 starts at row 1 and cluster 1 at
    // row 3, which then pulls row 0 in. The first row carrying id 1 comes
    // before the first row carrying id 0.
    let points = [
        5.0f64, 1.0, //
        1.0, 1.0, //
        1.2, 1.0, //
        5.4, 1.0, //
        1.4, 1.0, //
        5.6, 1.0,
    ];
    let corpus = DenseCorpus::new(&points, 6, 2).unwrap();
    let out = dbscan(&corpus, 0.45, 2).unwrap();
    assert_eq!(out.labels, vec![1, 0, 0, 1, 0, 1]);
    assert_eq!(out.noise, vec![true, false, false, false, false, false]);
    assert_eq!(out.num_clusters, 2);
    assert_eq!(out.members(1), vec![0, 3, 5]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let data = make_blobs::<f64>(7);
    let rows = BLOB_CENTERS.len() * BLOB_SIZE;
    for (kind, metric, eps) in [
        (CorpusKind::Dense, Metric::Euclidean, 0.1),
        (CorpusKind::Sparse, Metric::Cosine, 0.999),
    ] {
        let engine = Dbscan::from_buffer(&data, rows, 2, kind, metric).unwrap();
        let first = engine.run(eps, 5).unwrap();
        let second = engine.run(eps, 5).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_dense_cosine_is_rejected() {
    let points = [1.0f32, 0.0, 0.0, 1.0];
    let res = Dbscan::from_buffer(&points, 2, 2, CorpusKind::Dense, Metric::Cosine);
    match res {
        Err(Error::InvalidConfiguration(msg)) => {
            assert!(msg.contains("euclidean"));
        },
        Err(e) => panic!("Unexpected error: {}", e),
        Ok(_) => panic!("dense cosine should not build"),
    }

    let config = DbscanConfig {
        corpus: CorpusKind::Dense,
        metric: Metric::Cosine,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn test_config_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ndscan.toml");
    std::fs::write(
        &path,
        "eps = 0.5\nmin_pts = 2\ncorpus = \"sparse\"\nmetric = \"euclidean\"\nprecision = \"f32\"\n",
    )
    .unwrap();

    let config = DbscanConfig::from_toml(path.to_str().unwrap()).unwrap();
    assert_eq!(config.eps, 0.5);
    assert_eq!(config.min_pts, 2);
    assert_eq!(config.corpus, CorpusKind::Sparse);
    assert_eq!(config.precision, Precision::Single);
    assert!(!config.progress);
    assert!(config.validate().is_ok());

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "eps = \"wide\"\n").unwrap();
    assert!(matches!(
        DbscanConfig::from_toml(bad.to_str().unwrap()),
        Err(Error::TomlDe(_))
    ));
}
