use anyhow::Result;
use sexptree::read::{read_all, write_all};
use sexptree::settings::{CANONICAL, FLEXIBLE};
use sexptree::stream::spawn_read_all;

const INPUT: &[u8] = include_bytes!("t-input.sexp");
const EXPECTED: &[u8] = include_bytes!("t-expected.sexp");
const EXPECTED_CANONICAL: &[u8] = include_bytes!("t-expected-canonical.sexp");

#[test]
fn t1() -> Result<()> {
    let vals = read_all(INPUT, FLEXIBLE).into_result()?;
    let mut out = Vec::<u8>::new();
    write_all(&mut out, &vals)?;
    assert_eq!(String::from_utf8(out)?, String::from_utf8(EXPECTED.to_vec())?);
    Ok(())
}

#[test]
fn t1_canonical() -> Result<()> {
    let vals = read_all(INPUT, CANONICAL).into_result()?;
    let mut out = Vec::<u8>::new();
    write_all(&mut out, &vals)?;
    assert_eq!(String::from_utf8(out)?,
               String::from_utf8(EXPECTED_CANONICAL.to_vec())?);
    Ok(())
}

#[test]
fn t1_threaded() -> Result<()> {
    let (vals, err) = spawn_read_all(INPUT, FLEXIBLE);
    assert!(err.is_none());
    let mut out = Vec::<u8>::new();
    write_all(&mut out, &vals)?;
    assert_eq!(out, EXPECTED);
    Ok(())
}

#[test]
fn t1_rendering_reads_back() -> Result<()> {
    let vals = read_all(INPUT, FLEXIBLE).into_result()?;
    let again = read_all(EXPECTED, FLEXIBLE).into_result()?;
    assert_eq!(vals, again);
    Ok(())
}
