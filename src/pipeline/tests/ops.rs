use crate::error::SweepError;
use crate::pipeline::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_remove_duplicates_keeps_first() -> Result<()> {
    let df = df!(
        "name" => ["a", "a", "b"],
        "value" => [1i64, 1, 2],
    )?;
    let out = ops::remove_duplicates(&df)?;

    assert_eq!(out.height(), 2);
    let s = out.column("name")?.as_materialized_series();
    let ca = s.str()?;
    assert_eq!(ca.get(0).unwrap(), "a");
    assert_eq!(ca.get(1).unwrap(), "b");
    Ok(())
}

#[test]
fn test_remove_duplicates_idempotent() -> Result<()> {
    let df = df!("a" => [1i64, 1, 2, 2, 3])?;
    let once = ops::remove_duplicates(&df)?;
    let twice = ops::remove_duplicates(&once)?;

    assert_eq!(once.height(), 3);
    assert!(once.equals(&twice));
    Ok(())
}

#[test]
fn test_fill_missing_numeric_uses_mean() -> Result<()> {
    let df = df!(
        "x" => [Some(1.0f64), None, Some(3.0)],
        "label" => [Some("a"), None, Some("c")],
    )?;
    let out = ops::fill_missing_numeric(&df)?;

    let s = out.column("x")?.as_materialized_series();
    let ca = s.f64()?;
    // mean of 1 and 3
    assert_eq!(ca.get(1), Some(2.0));
    assert_eq!(out.column("x")?.null_count(), 0);
    // text column untouched
    assert_eq!(out.column("label")?.null_count(), 1);
    Ok(())
}

#[test]
fn test_fill_missing_idempotent_and_all_null_untouched() -> Result<()> {
    let df = df!(
        "x" => [Some(1.0f64), None, Some(3.0)],
        "empty" => [None::<f64>, None, None],
    )?;
    let once = ops::fill_missing_numeric(&df)?;
    assert_eq!(once.column("empty")?.null_count(), 3);

    let twice = ops::fill_missing_numeric(&once)?;
    assert!(once.equals_missing(&twice));
    Ok(())
}

#[test]
fn test_remove_outliers_drops_extreme_row() -> Result<()> {
    let mut values: Vec<f64> = (1..=20).map(f64::from).collect();
    values.push(1000.0);
    let df = df!("v" => values)?;

    let out = ops::remove_outliers(&df, 3.0)?;
    assert_eq!(out.height(), 20);
    let s = out.column("v")?.as_materialized_series();
    assert_eq!(s.f64()?.max(), Some(20.0));
    Ok(())
}

#[test]
fn test_remove_outliers_not_idempotent() -> Result<()> {
    // A masked outlier: 5000 hides 80 on the first pass
    let mut values: Vec<f64> = (1..=11).map(f64::from).collect();
    values.push(80.0);
    values.push(5000.0);
    let df = df!("v" => values)?;

    let once = ops::remove_outliers(&df, 3.0)?;
    assert_eq!(once.height(), 12);
    let twice = ops::remove_outliers(&once, 3.0)?;
    assert_eq!(twice.height(), 11);
    Ok(())
}

#[test]
fn test_zero_variance_column_exerts_no_constraint() -> Result<()> {
    let df = df!(
        "constant" => [5.0f64, 5.0, 5.0, 5.0],
        "varied" => [1.0f64, 2.0, 3.0, 4.0],
    )?;
    let out = ops::remove_outliers(&df, 3.0)?;
    assert_eq!(out.height(), 4);
    Ok(())
}

#[test]
fn test_single_row_exerts_no_constraint() -> Result<()> {
    // Sample std needs two values, so one row sails through
    let df = df!("v" => [42.0f64])?;
    let out = ops::remove_outliers(&df, 3.0)?;
    assert_eq!(out.height(), 1);
    Ok(())
}

#[test]
fn test_null_in_constrained_column_drops_row() -> Result<()> {
    let df = df!("v" => [Some(1.0f64), Some(2.0), None, Some(3.0), Some(2.0)])?;
    let out = ops::remove_outliers(&df, 3.0)?;

    assert_eq!(out.height(), 4);
    assert_eq!(out.column("v")?.null_count(), 0);
    Ok(())
}

#[test]
fn test_coerce_to_numeric_permissive() -> Result<()> {
    let df = df!("raw" => ["1", "x", "3"])?;
    let out = ops::coerce_to_numeric(&df, "raw")?;

    assert_eq!(out.column("raw")?.dtype(), &DataType::Float64);
    assert_eq!(
        ColumnKind::from_dtype(out.column("raw")?.dtype()),
        ColumnKind::Numeric
    );
    let s = out.column("raw")?.as_materialized_series();
    let ca = s.f64()?;
    assert_eq!(ca.get(0), Some(1.0));
    assert_eq!(ca.get(1), None);
    assert_eq!(ca.get(2), Some(3.0));
    Ok(())
}

#[test]
fn test_coerce_boolean_column() -> Result<()> {
    let df = df!("flag" => [true, false, true])?;
    let out = ops::coerce_to_numeric(&df, "flag")?;

    let s = out.column("flag")?.as_materialized_series();
    let ca = s.f64()?;
    assert_eq!(ca.get(0), Some(1.0));
    assert_eq!(ca.get(1), Some(0.0));
    Ok(())
}

#[test]
fn test_coerce_unknown_column() {
    let df = df!("a" => [1i64]).unwrap();
    let err = ops::coerce_to_numeric(&df, "missing").unwrap_err();
    assert!(matches!(
        err,
        SweepError::UnknownColumn { column } if column == "missing"
    ));
}

#[test]
fn test_pipeline_json_round_trip() -> Result<()> {
    let mut pipeline = OpPipeline::empty();
    pipeline.add(CleaningOp::CoerceToNumeric {
        column: "age".to_string(),
    });
    pipeline.add(CleaningOp::RemoveDuplicates);
    pipeline.add(CleaningOp::RemoveOutliers {
        threshold_sigma: 2.5,
    });

    let json = pipeline.to_json()?;
    let restored = OpPipeline::from_json(&json)?;
    assert_eq!(pipeline, restored);
    assert_eq!(restored.len(), 3);
    Ok(())
}

#[test]
fn test_pipeline_default_threshold_from_json() -> Result<()> {
    let json = r#"{"ops": [{"op": "remove_outliers"}]}"#;
    let pipeline = OpPipeline::from_json(json)?;
    assert_eq!(
        pipeline.iter().next(),
        Some(&CleaningOp::RemoveOutliers {
            threshold_sigma: 3.0
        })
    );
    Ok(())
}

#[test]
fn test_pipeline_applies_in_order() -> Result<()> {
    // Coercion first so duplicate removal compares numeric values
    let df = df!("v" => ["1", "1", "2"])?;
    let pipeline = OpPipeline::new(vec![
        CleaningOp::CoerceToNumeric {
            column: "v".to_string(),
        },
        CleaningOp::RemoveDuplicates,
    ]);
    let out = pipeline.apply(&df)?;

    assert_eq!(out.height(), 2);
    assert_eq!(out.column("v")?.dtype(), &DataType::Float64);
    Ok(())
}
