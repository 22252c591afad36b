use algotty::config::TraceLimits;
use algotty::errors::{GeneratorError, PlaybackError};
use algotty::generators::{AlgorithmId, GeneratorInput};
use algotty::snapshot::{InfoValue, Playback, Step, Stepper, INFINITY};
use test_case::test_case;

fn run(algorithm: AlgorithmId, input: GeneratorInput) -> Vec<Step> {
    algorithm
        .generate_steps(&input, TraceLimits::default())
        .unwrap_or_else(|e| panic!("{} failed: {}", algorithm, e))
}

fn numbers(values: &[i64]) -> GeneratorInput {
    GeneratorInput::Numbers(values.to_vec())
}

#[test_case(AlgorithmId::BubbleSort ; "bubble")]
#[test_case(AlgorithmId::SelectionSort ; "selection")]
#[test_case(AlgorithmId::MergeSort ; "merge")]
#[test_case(AlgorithmId::CountingSort ; "counting")]
#[test_case(AlgorithmId::RadixSort ; "radix")]
fn every_sort_orders_the_sample(algorithm: AlgorithmId) {
    let steps = run(algorithm, numbers(&[29, 3, 170, 45, 3, 0, 802, 24]));
    let last = steps.last().unwrap();
    assert_eq!(last.values(), vec![0, 3, 3, 24, 29, 45, 170, 802]);
    assert!(last.array.iter().all(|e| e.is_sorted));
    assert_eq!((steps[0].comparisons, steps[0].swaps), (0, 0));
}

#[test]
fn every_code_line_is_inside_its_listing() {
    let inputs = [
        (AlgorithmId::BubbleSort, numbers(&[3, 1, 2])),
        (AlgorithmId::SelectionSort, numbers(&[3, 1, 2])),
        (AlgorithmId::MergeSort, numbers(&[3, 1, 2])),
        (AlgorithmId::CountingSort, numbers(&[3, 1, 2])),
        (AlgorithmId::RadixSort, numbers(&[31, 1, 200])),
        (AlgorithmId::Gcd, numbers(&[48, 18])),
        (AlgorithmId::ModularExponentiation, numbers(&[3, 13, 100])),
        (AlgorithmId::PrimeFactorization, numbers(&[360])),
        (AlgorithmId::Fibonacci, numbers(&[10])),
        (AlgorithmId::Sieve, numbers(&[30])),
        (
            AlgorithmId::Dijkstra,
            GeneratorInput::Matrix {
                json: "[[0,4,1],[4,0,2],[1,2,0]]".into(),
                source: 0,
            },
        ),
        (AlgorithmId::Tarjan, GeneratorInput::Adjacency(vec![vec![1], vec![2], vec![0, 3], vec![]])),
        (
            AlgorithmId::Kmp,
            GeneratorInput::Text {
                text: "abababcab".into(),
                pattern: "abab".into(),
            },
        ),
        (
            AlgorithmId::Maze,
            GeneratorInput::Dimensions {
                width: 9,
                height: 7,
                seed: Some(3),
            },
        ),
    ];
    for (algorithm, input) in inputs {
        let listing = algorithm.pseudocode().len();
        for step in run(algorithm, input) {
            assert!(
                step.code_line < listing,
                "{}: line {} of {} in '{}'",
                algorithm,
                step.code_line,
                listing,
                step.description
            );
        }
    }
}

#[test_case(AlgorithmId::Gcd, &[48, -18], "gcd", 6 ; "gcd of signed inputs")]
#[test_case(AlgorithmId::Gcd, &[5, i64::MIN], "gcd", 1 ; "gcd with the minimum i64")]
#[test_case(AlgorithmId::ModularExponentiation, &[3, 13, 100], "result", 23 ; "three to the thirteenth")]
#[test_case(AlgorithmId::ModularExponentiation, &[-7, 5], "result", 3 ; "plain modulo is non-negative")]
#[test_case(AlgorithmId::Fibonacci, &[20], "result", 6765 ; "twentieth term")]
fn numeric_results(algorithm: AlgorithmId, values: &[i64], key: &str, expected: i64) {
    let steps = run(algorithm, numbers(values));
    assert_eq!(steps.last().unwrap().info[key].as_int(), Some(expected));
}

#[test]
fn factorization_and_sieve_results() {
    let factors = run(AlgorithmId::PrimeFactorization, numbers(&[360]));
    assert_eq!(
        factors.last().unwrap().info["factors"],
        InfoValue::List(vec![2, 2, 2, 3, 3, 5])
    );
    let sieve = run(AlgorithmId::Sieve, numbers(&[20]));
    assert_eq!(
        sieve.last().unwrap().info["primes"],
        InfoValue::List(vec![2, 3, 5, 7, 11, 13, 17, 19])
    );
}

#[test_case(AlgorithmId::Gcd, &[1, 2, 3] ; "gcd with three values")]
#[test_case(AlgorithmId::PrimeFactorization, &[] ; "factorize with nothing")]
#[test_case(AlgorithmId::Fibonacci, &[-1] ; "negative fibonacci index")]
#[test_case(AlgorithmId::ModularExponentiation, &[2, 3, 0] ; "zero modulus")]
fn malformed_numeric_input_yields_one_error_step(algorithm: AlgorithmId, values: &[i64]) {
    let steps = run(algorithm, numbers(values));
    assert_eq!(steps.len(), 1);
    assert!(steps[0].is_error());
}

#[test_case(AlgorithmId::CountingSort ; "counting")]
#[test_case(AlgorithmId::RadixSort ; "radix")]
fn negative_values_are_a_domain_error(algorithm: AlgorithmId) {
    let err = algorithm
        .generate_steps(&numbers(&[4, -1, 2]), TraceLimits::default())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::NegativeValue { value: -1, .. }));
}

#[test]
fn oversized_arrays_are_rejected() {
    let values: Vec<i64> = (0..801).collect();
    let err = AlgorithmId::BubbleSort
        .generate_steps(&GeneratorInput::Numbers(values), TraceLimits::default())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::InputTooLarge { len: 801, .. }));
}

#[test]
fn dijkstra_distances_and_unreachable_nodes() {
    let steps = run(
        AlgorithmId::Dijkstra,
        GeneratorInput::Matrix {
            json: "[[0,4,1,0],[4,0,2,0],[1,2,0,0],[0,0,0,0]]".into(),
            source: 0,
        },
    );
    assert_eq!(steps.last().unwrap().values(), vec![0, 3, 1, INFINITY]);
}

#[test_case("not json" ; "garbage")]
#[test_case("[[0,1],[1]]" ; "ragged")]
#[test_case("[]" ; "empty")]
fn malformed_matrix_yields_an_empty_trace(json: &str) {
    let steps = run(
        AlgorithmId::Dijkstra,
        GeneratorInput::Matrix {
            json: json.into(),
            source: 0,
        },
    );
    assert!(steps.is_empty());
}

#[test]
fn tarjan_reports_components() {
    let steps = run(
        AlgorithmId::Tarjan,
        GeneratorInput::Adjacency(vec![vec![1], vec![2], vec![0, 3], vec![4], vec![3]]),
    );
    let InfoValue::Table(sccs) = &steps.last().unwrap().info["sccs"] else {
        panic!("sccs is not a table");
    };
    let mut sccs: Vec<Vec<i64>> = sccs
        .iter()
        .map(|c| {
            let mut c = c.clone();
            c.sort();
            c
        })
        .collect();
    sccs.sort();
    assert_eq!(sccs, vec![vec![0, 1, 2], vec![3, 4]]);
}

#[test]
fn kmp_finds_overlapping_matches() {
    let steps = run(
        AlgorithmId::Kmp,
        GeneratorInput::Text {
            text: "abababab".into(),
            pattern: "abab".into(),
        },
    );
    assert_eq!(
        steps.last().unwrap().info["matches"],
        InfoValue::List(vec![0, 2, 4])
    );
}

#[test]
fn maze_is_reproducible_from_a_seed() {
    let input = GeneratorInput::Dimensions {
        width: 11,
        height: 9,
        seed: Some(42),
    };
    let a = run(AlgorithmId::Maze, input.clone());
    let b = run(AlgorithmId::Maze, input);
    assert_eq!(a.len(), 1);
    assert_eq!(a, b);
}

#[test]
fn mismatched_input_kind_is_rejected() {
    let err = AlgorithmId::Kmp
        .generate_steps(&numbers(&[1, 2]), TraceLimits::default())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::WrongInputKind { .. }));
}

#[test]
fn slugs_round_trip_through_from_str() {
    for id in AlgorithmId::ALL {
        assert_eq!(id.slug().parse::<AlgorithmId>(), Ok(id));
    }
    assert!("quicksort".parse::<AlgorithmId>().is_err());
}

#[test]
fn playback_scrubs_a_generated_trace() {
    let steps = run(AlgorithmId::BubbleSort, numbers(&[3, 2, 1]));
    let total = steps.len();
    let mut playback = Playback::new(steps).unwrap();

    assert_eq!(playback.step_backward(), Err(PlaybackError::AtStart));
    while playback.step_forward().is_ok() {}
    assert_eq!(playback.position(), total - 1);
    assert_eq!(playback.step_forward(), Err(PlaybackError::AtEnd));
    assert_eq!(playback.position(), total - 1);
    assert_eq!(playback.narration().len(), total);
    assert_eq!(playback.current().values(), vec![1, 2, 3]);

    playback.rewind_to_start().unwrap();
    assert_eq!(playback.position(), 0);
    assert_eq!(playback.narration().len(), 1);
}

#[test]
fn steps_do_not_share_arrays() {
    let mut steps = run(AlgorithmId::SelectionSort, numbers(&[4, 2, 3, 1]));
    let before: Vec<Vec<i64>> = steps.iter().map(Step::values).collect();
    let k = steps.len() / 2;
    for slot in steps[k].array.iter_mut() {
        slot.value = -99;
    }
    assert_eq!(steps[k - 1].values(), before[k - 1]);
    assert_eq!(steps[k + 1].values(), before[k + 1]);
}

#[test]
fn gcd_of_zeros_is_zero() {
    let steps = run(AlgorithmId::Gcd, numbers(&[0, 0]));
    assert_eq!(steps.last().unwrap().info["gcd"].as_int(), Some(0));
}

fn assert_counters_never_decrease(algorithm: AlgorithmId, steps: &[Step]) {
    for (k, pair) in steps.windows(2).enumerate() {
        assert!(
            pair[0].comparisons <= pair[1].comparisons && pair[0].swaps <= pair[1].swaps,
            "{}: counters went from ({}, {}) to ({}, {}) at step {}",
            algorithm,
            pair[0].comparisons,
            pair[0].swaps,
            pair[1].comparisons,
            pair[1].swaps,
            k + 1
        );
    }
}

#[test_case(AlgorithmId::Gcd, numbers(&[1071, 462]) ; "gcd")]
#[test_case(AlgorithmId::Gcd, numbers(&[5, i64::MIN]) ; "gcd with the minimum i64")]
#[test_case(AlgorithmId::ModularExponentiation, numbers(&[7, 560, 561]) ; "modexp")]
#[test_case(AlgorithmId::PrimeFactorization, numbers(&[9240]) ; "factorize")]
#[test_case(AlgorithmId::Fibonacci, numbers(&[30]) ; "fibonacci")]
#[test_case(AlgorithmId::Sieve, numbers(&[100]) ; "sieve")]
#[test_case(
    AlgorithmId::Dijkstra,
    GeneratorInput::Matrix { json: "[[0,4,1,0],[0,0,0,1],[0,2,0,5],[0,0,0,0]]".into(), source: 0 }
    ; "dijkstra"
)]
#[test_case(
    AlgorithmId::Tarjan,
    GeneratorInput::Adjacency(vec![vec![1], vec![2], vec![0, 3], vec![4], vec![3], vec![]])
    ; "tarjan"
)]
#[test_case(
    AlgorithmId::Kmp,
    GeneratorInput::Text { text: "AABAACAADAABAABA".into(), pattern: "AABA".into() }
    ; "kmp across both phases"
)]
fn counters_never_decrease_across_a_trace(algorithm: AlgorithmId, input: GeneratorInput) {
    let steps = run(algorithm, input);
    assert!(!steps.is_empty());
    assert_counters_never_decrease(algorithm, &steps);
}

#[test]
fn dijkstra_source_outside_the_matrix_yields_an_empty_trace() {
    let steps = run(
        AlgorithmId::Dijkstra,
        GeneratorInput::Matrix {
            json: "[[0,1],[1,0]]".into(),
            source: 5,
        },
    );
    assert!(steps.is_empty());
}

#[test]
fn oversized_maze_is_a_dimension_error() {
    let err = AlgorithmId::Maze
        .generate_steps(
            &GeneratorInput::Dimensions {
                width: usize::MAX,
                height: 5,
                seed: Some(1),
            },
            TraceLimits::default(),
        )
        .unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidDimensions { .. }));
}
