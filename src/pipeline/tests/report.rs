use crate::pipeline::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_preview_is_detached_head() -> Result<()> {
    let df = df!("n" => (0i64..10).collect::<Vec<_>>())?;
    let head = preview(&df, 5);

    assert_eq!(head.height(), 5);
    assert_eq!(df.height(), 10);
    Ok(())
}

#[test]
fn test_preview_shorter_than_requested() -> Result<()> {
    let df = df!("n" => [1i64, 2])?;
    assert_eq!(preview(&df, 5).height(), 2);
    Ok(())
}

#[test]
fn test_preview_empty_table() -> Result<()> {
    let df = df!("n" => Vec::<f64>::new())?;
    let head = preview(&df, 5);
    assert_eq!(head.height(), 0);
    assert_eq!(head.width(), 1);
    Ok(())
}

#[test]
fn test_summarize_quartiles() -> Result<()> {
    let df = df!(
        "v" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "label" => ["a", "b", "c", "d", "e"],
    )?;
    let summaries = summarize(&df)?;

    assert_eq!(summaries.len(), 1);
    let s = &summaries[0];
    assert_eq!(s.column, "v");
    assert_eq!(s.count, 5);
    assert_eq!(s.mean, Some(3.0));
    assert_eq!(s.min, Some(1.0));
    assert_eq!(s.q1, Some(2.0));
    assert_eq!(s.median, Some(3.0));
    assert_eq!(s.q3, Some(4.0));
    assert_eq!(s.max, Some(5.0));
    // sample std of 1..5 is sqrt(2.5)
    assert!((s.std_dev.unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_summarize_skips_nulls_in_count() -> Result<()> {
    let df = df!("v" => [Some(1.0f64), None, Some(3.0)])?;
    let summaries = summarize(&df)?;

    let s = &summaries[0];
    assert_eq!(s.count, 2);
    assert_eq!(s.mean, Some(2.0));
    Ok(())
}

#[test]
fn test_summarize_integer_column() -> Result<()> {
    let df = df!("n" => [10i64, 20, 30])?;
    let summaries = summarize(&df)?;

    let s = &summaries[0];
    assert_eq!(s.mean, Some(20.0));
    assert_eq!(s.max, Some(30.0));
    Ok(())
}

#[test]
fn test_summarize_all_null_column() -> Result<()> {
    let df = df!("v" => [None::<f64>, None])?;
    let summaries = summarize(&df)?;

    let s = &summaries[0];
    assert_eq!(s.count, 0);
    assert_eq!(s.mean, None);
    assert_eq!(s.std_dev, None);
    assert_eq!(s.min, None);
    Ok(())
}

#[test]
fn test_summarize_no_numeric_columns() -> Result<()> {
    let df = df!("label" => ["a", "b"])?;
    assert!(summarize(&df)?.is_empty());
    Ok(())
}

#[test]
fn test_missing_report_in_column_order() -> Result<()> {
    let df = df!(
        "full" => [1i64, 2],
        "holes" => [None::<&str>, Some("x")],
        "also" => [None::<f64>, None],
    )?;
    let report = missing_report(&df);

    assert_eq!(report.len(), 2);
    assert_eq!(report[0].column, "holes");
    assert_eq!(report[0].null_count, 1);
    assert_eq!(report[1].column, "also");
    assert_eq!(report[1].null_count, 2);
    Ok(())
}

#[test]
fn test_missing_report_empty_when_table_full() -> Result<()> {
    let df = df!("a" => [1i64, 2], "b" => ["x", "y"])?;
    assert!(missing_report(&df).is_empty());
    Ok(())
}
