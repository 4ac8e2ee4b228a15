mod common;

use std::collections::BTreeSet;

use common::{date, station};
use doublemass_core::{join, DoubleMassError};

const FILE_A: &str = "IDCJAC0009_086338_1800_Data.csv";
const FILE_B: &str = "IDCJAC0009_086071_1800_Data.csv";

#[test]
fn join_keeps_only_dates_complete_in_both() {
    let a = station(
        FILE_A,
        &[
            (2020, 1, 1, Some(1.0)),
            (2020, 1, 2, Some(2.0)),
            (2020, 1, 3, None),
            (2020, 1, 5, Some(5.0)),
        ],
    );
    let b = station(
        FILE_B,
        &[
            (2020, 1, 2, Some(20.0)),
            (2020, 1, 3, Some(30.0)),
            (2020, 1, 4, Some(40.0)),
            (2020, 1, 5, Some(50.0)),
        ],
    );

    let aligned = join(&a, &b).expect("join");

    let complete_a: BTreeSet<_> = [date(2020, 1, 1), date(2020, 1, 2), date(2020, 1, 5)].into();
    let complete_b: BTreeSet<_> = [
        date(2020, 1, 2),
        date(2020, 1, 3),
        date(2020, 1, 4),
        date(2020, 1, 5),
    ]
    .into();
    let expected: Vec<_> = complete_a.intersection(&complete_b).copied().collect();

    assert_eq!(aligned.dates().unwrap(), expected);
    assert_eq!(aligned.values_a().unwrap(), vec![2.0, 5.0]);
    assert_eq!(aligned.values_b().unwrap(), vec![20.0, 50.0]);
    assert_eq!(aligned.df.get_column_names(), ["date", "value_a", "value_b"]);
}

#[test]
fn join_sorts_by_date_regardless_of_input_order() {
    let a = station(
        FILE_A,
        &[
            (2020, 3, 1, Some(3.0)),
            (2019, 12, 31, Some(1.0)),
            (2020, 1, 15, Some(2.0)),
        ],
    );
    let b = station(
        FILE_B,
        &[
            (2020, 1, 15, Some(20.0)),
            (2020, 3, 1, Some(30.0)),
            (2019, 12, 31, Some(10.0)),
        ],
    );

    let aligned = join(&a, &b).expect("join");

    assert_eq!(
        aligned.dates().unwrap(),
        vec![date(2019, 12, 31), date(2020, 1, 15), date(2020, 3, 1)]
    );
    assert_eq!(aligned.values_a().unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(aligned.values_b().unwrap(), vec![10.0, 20.0, 30.0]);
}

#[test]
fn join_without_common_complete_dates_fails() {
    let a = station(FILE_A, &[(2020, 1, 1, Some(1.0)), (2020, 1, 2, None)]);
    let b = station(FILE_B, &[(2020, 1, 2, Some(2.0)), (2020, 1, 3, Some(3.0))]);

    let err = join(&a, &b).unwrap_err();
    match err {
        DoubleMassError::EmptyIntersection {
            station_a,
            station_b,
        } => {
            assert_eq!(station_a, "086338");
            assert_eq!(station_b, "086071");
        }
        other => panic!("expected EmptyIntersection, got {other:?}"),
    }
}

#[test]
fn join_rejects_same_station_twice() {
    let a = station(FILE_A, &[(2020, 1, 1, Some(1.0))]);
    let b = station("IDCJAC0009_086338_copy.csv", &[(2020, 1, 1, Some(1.0))]);

    let err = join(&a, &b).unwrap_err();
    assert!(matches!(err, DoubleMassError::DuplicateStation { .. }));
}

#[test]
fn join_handles_station_ids_that_look_like_column_patterns() {
    let a = station(
        "IDCJAC0009_date_1800_Data.csv",
        &[(2020, 1, 1, Some(1.0)), (2020, 1, 2, Some(2.0))],
    );
    let b = station(
        "IDCJAC0009_*_1800_Data.csv",
        &[(2020, 1, 2, Some(20.0)), (2020, 1, 1, Some(10.0))],
    );

    let aligned = join(&a, &b).expect("join");

    assert_eq!(aligned.station_a.as_str(), "date");
    assert_eq!(aligned.station_b.as_str(), "*");
    assert_eq!(aligned.dates().unwrap(), vec![date(2020, 1, 1), date(2020, 1, 2)]);
    assert_eq!(aligned.values_a().unwrap(), vec![1.0, 2.0]);
    assert_eq!(aligned.values_b().unwrap(), vec![10.0, 20.0]);
}
