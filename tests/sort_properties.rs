use algotty::config::TraceLimits;
use algotty::generators::{AlgorithmId, GeneratorInput};
use algotty::snapshot::Step;
use proptest::prelude::*;

const SORTS: [AlgorithmId; 5] = [
    AlgorithmId::BubbleSort,
    AlgorithmId::SelectionSort,
    AlgorithmId::MergeSort,
    AlgorithmId::CountingSort,
    AlgorithmId::RadixSort,
];

fn trace(algorithm: AlgorithmId, values: &[i64]) -> Vec<Step> {
    algorithm
        .generate_steps(&GeneratorInput::Numbers(values.to_vec()), TraceLimits::default())
        .unwrap()
}

/// Sorts that accept negative values
const SIGNED_SORTS: [AlgorithmId; 3] = [
    AlgorithmId::BubbleSort,
    AlgorithmId::SelectionSort,
    AlgorithmId::MergeSort,
];

proptest! {
    #[test]
    fn comparison_sorts_order_negative_values(values in prop::collection::vec(-1000i64..1000, 0..40)) {
        let mut expected = values.clone();
        expected.sort();
        for algorithm in SIGNED_SORTS {
            let steps = trace(algorithm, &values);
            let last = steps.last().unwrap();
            prop_assert_eq!(last.values(), expected.clone(), "{}", algorithm);
            for pair in last.array.windows(2) {
                if pair[0].value == pair[1].value {
                    prop_assert!(pair[0].origin < pair[1].origin, "{} is unstable", algorithm);
                }
            }
        }
    }


    #[test]
    fn final_step_is_the_sorted_input(values in prop::collection::vec(0i64..1000, 0..40)) {
        let mut expected = values.clone();
        expected.sort();
        for algorithm in SORTS {
            let steps = trace(algorithm, &values);
            let last = steps.last().unwrap();
            prop_assert_eq!(last.values(), expected.clone(), "{}", algorithm);
            prop_assert!(last.array.iter().all(|e| e.is_sorted));
        }
    }

    #[test]
    fn equal_values_keep_input_order(values in prop::collection::vec(0i64..5, 0..30)) {
        for algorithm in SORTS {
            let steps = trace(algorithm, &values);
            let last = steps.last().unwrap();
            for pair in last.array.windows(2) {
                if pair[0].value == pair[1].value {
                    prop_assert!(pair[0].origin < pair[1].origin, "{} is unstable", algorithm);
                }
            }
        }
    }

    #[test]
    fn counters_never_decrease(values in prop::collection::vec(0i64..200, 0..25)) {
        for algorithm in SORTS {
            let steps = trace(algorithm, &values);
            prop_assert_eq!((steps[0].comparisons, steps[0].swaps), (0, 0));
            for pair in steps.windows(2) {
                prop_assert!(pair[0].comparisons <= pair[1].comparisons);
                prop_assert!(pair[0].swaps <= pair[1].swaps);
            }
        }
    }

    #[test]
    fn every_step_keeps_the_input_length(values in prop::collection::vec(0i64..300, 0..25)) {
        for algorithm in SORTS {
            for step in trace(algorithm, &values) {
                prop_assert_eq!(step.array.len(), values.len());
            }
        }
    }

    #[test]
    fn first_step_shows_the_untouched_input(values in prop::collection::vec(0i64..300, 1..25)) {
        for algorithm in SORTS {
            let steps = trace(algorithm, &values);
            prop_assert_eq!(steps[0].values(), values.clone());
        }
    }
}
