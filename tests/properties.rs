use proptest::prelude::*;
use randphase::process::{PHASE_HIGH, PHASE_LOW};
use randphase::{estimate_streaming, EnsembleStats, RandomPhaseProcess, TimeGrid};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn shapes_and_bounds_hold(
        n in 1usize..40,
        m in 1usize..40,
        omega in -20.0f64..20.0,
        t_end in 0.0f64..50.0,
        seed in any::<u64>(),
    ) {
        let grid = TimeGrid::linspace(0.0, t_end, m).unwrap();
        let process = RandomPhaseProcess::new(omega).unwrap();
        let run = process.simulate(&grid, n, seed).unwrap();

        prop_assert_eq!(run.samples.rows(), n);
        prop_assert_eq!(run.samples.cols(), m);
        prop_assert_eq!(run.phases.len(), n);
        for &theta in run.phases.as_slice() {
            prop_assert!((PHASE_LOW..=PHASE_HIGH).contains(&theta));
        }

        let stats = EnsembleStats::from_matrix(&run.samples).unwrap();
        prop_assert_eq!(stats.mean.len(), m);
        prop_assert_eq!(stats.variance.len(), m);
        for &v in &stats.variance {
            prop_assert!(v >= 0.0);
        }
    }

    #[test]
    fn streaming_agrees_with_matrix_reduction(
        n in 1usize..60,
        m in 1usize..30,
        seed in any::<u64>(),
    ) {
        let grid = TimeGrid::linspace(0.0, 3.0, m).unwrap();
        let process = RandomPhaseProcess::new(std::f64::consts::TAU).unwrap();
        let run = process.simulate(&grid, n, seed).unwrap();
        let batch = EnsembleStats::from_matrix(&run.samples).unwrap();
        let streamed = estimate_streaming(&process, &grid, n, seed).unwrap();

        for j in 0..m {
            prop_assert!((batch.mean[j] - streamed.mean[j]).abs() < 1e-12);
            prop_assert!((batch.variance[j] - streamed.variance[j]).abs() < 1e-12);
        }
    }
}
