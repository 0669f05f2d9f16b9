use formula_engine::{ErrorKind, Value, ValueLocaleConfig};
use formula_format::Locale;
use pretty_assertions::assert_eq;

use super::harness::{assert_number, assert_time, TestEval};

#[test]
fn time_within_a_single_day() {
    let eval = TestEval::new();
    for (formula, expected) in [
        ("=TIME(0,0,0)", "00:00:00"),
        ("=TIME(0,0,1)", "00:00:01"),
        ("=TIME(0,1,0)", "00:01:00"),
        ("=TIME(1,0,0)", "01:00:00"),
        ("=TIME(6,0,0)", "06:00:00"),
        ("=TIME(6,1,0)", "06:01:00"),
        ("=TIME(6,30,0)", "06:30:00"),
        ("=TIME(6,59,0)", "06:59:00"),
        ("=TIME(12,0,0)", "12:00:00"),
        ("=TIME(18,49,0)", "18:49:00"),
        ("=TIME(18,49,1)", "18:49:01"),
        ("=TIME(18,49,30)", "18:49:30"),
        ("=TIME(18,49,59)", "18:49:59"),
        ("=TIME(23,0,0)", "23:00:00"),
    ] {
        assert_time(&eval, formula, expected);
    }
}

#[test]
fn time_carries_overflowing_units() {
    let eval = TestEval::new();
    for (formula, expected) in [
        ("=TIME(6,60,0)", "07:00:00"),
        ("=TIME(6,61,0)", "07:01:00"),
        ("=TIME(6,120,0)", "08:00:00"),
        ("=TIME(18,49,60)", "18:50:00"),
        ("=TIME(18,49,61)", "18:50:01"),
        ("=TIME(18,49,119)", "18:50:59"),
        ("=TIME(18,49,120)", "18:51:00"),
    ] {
        assert_time(&eval, formula, expected);
    }
}

#[test]
fn time_discards_whole_days() {
    let eval = TestEval::new();
    for (formula, expected) in [
        ("=TIME(24,0,0)", "00:00:00"),
        ("=TIME(25,0,0)", "01:00:00"),
        ("=TIME(48,0,0)", "00:00:00"),
        ("=TIME(6,1440,0)", "06:00:00"),
        ("=TIME(18,49,32767)", "03:55:07"),
        ("=TIME(18,32767,61)", "12:08:01"),
        ("=TIME(32767,49,61)", "07:50:01"),
    ] {
        assert_time(&eval, formula, expected);
    }
}

#[test]
fn time_reads_missing_arguments_as_zero() {
    let eval = TestEval::new();
    assert_time(&eval, "=TIME(,0,0)", "00:00:00");
    assert_time(&eval, "=TIME(12,,)", "12:00:00");
    assert_time(&eval, "=TIME(,,)", "00:00:00");
}

#[test]
fn time_wraps_negative_totals() {
    let eval = TestEval::new();
    assert_time(&eval, "=TIME(0,0,-1)", "23:59:59");
    assert_time(&eval, "=TIME(-1,0,0)", "23:00:00");
    assert_time(&eval, "=TIME(1,-30,0)", "00:30:00");
}

#[test]
fn time_coerces_arguments() {
    let eval = TestEval::new();
    assert_time(&eval, "=TIME(6.9,30.2,0.99)", "06:30:00");
    assert_time(&eval, "=TIME(TRUE,FALSE,0)", "01:00:00");
    assert_time(&eval, "=TIME(\"18\",\"49\",\"1\")", "18:49:01");
    assert_eq!(eval.eval("=TIME(\"x\",0,0)"), Value::Error(ErrorKind::Value));
    assert_eq!(eval.eval("=TIME(1e300,0,0)"), Value::Error(ErrorKind::Num));
}

#[test]
fn time_propagates_the_first_error() {
    let eval = TestEval::new();
    assert_eq!(eval.eval("=TIME(#REF!,0,0)"), Value::Error(ErrorKind::Ref));
    assert_eq!(eval.eval("=TIME(1,#N/A,#DIV/0!)"), Value::Error(ErrorKind::NA));
}

#[test]
fn time_requires_three_arguments() {
    let eval = TestEval::new();
    assert_eq!(eval.eval("=TIME(1,2)"), Value::Error(ErrorKind::Value));
    assert_eq!(eval.eval("=TIME(1,2,3,4)"), Value::Error(ErrorKind::Value));
    assert_eq!(eval.eval("=TIME()"), Value::Error(ErrorKind::Value));
}

#[test]
fn hour_minute_second_decompose_serials() {
    let eval = TestEval::new();
    assert_number(&eval.eval("=HOUR(TIME(1,2,3))"), 1.0);
    assert_number(&eval.eval("=MINUTE(TIME(1,2,3))"), 2.0);
    assert_number(&eval.eval("=SECOND(TIME(1,2,3))"), 3.0);

    assert_number(&eval.eval("=HOUR(TIME(18,49,32767))"), 3.0);
    assert_number(&eval.eval("=MINUTE(TIME(18,49,32767))"), 55.0);
    assert_number(&eval.eval("=SECOND(TIME(18,49,32767))"), 7.0);

    // Whole days are ignored.
    assert_number(&eval.eval("=HOUR(45000.75)"), 18.0);
    assert_number(&eval.eval("=HOUR(\"6:45 PM\")"), 18.0);
    assert_number(&eval.eval("=MINUTE(\"6:45 PM\")"), 45.0);
}

#[test]
fn hour_minute_second_reject_bad_serials() {
    let eval = TestEval::new();
    assert_eq!(eval.eval("=HOUR(-0.5)"), Value::Error(ErrorKind::Num));
    assert_eq!(eval.eval("=MINUTE(\"noon\")"), Value::Error(ErrorKind::Value));
    assert_eq!(eval.eval("=SECOND(#NAME?)"), Value::Error(ErrorKind::Name));
    assert_eq!(eval.eval("=SECOND()"), Value::Error(ErrorKind::Value));
}

#[test]
fn timevalue_parses_time_text() {
    let eval = TestEval::new();
    assert_number(&eval.eval("=TIMEVALUE(\"1:30\")"), 0.0625);
    assert_number(&eval.eval("=TIMEVALUE(\"1:30 PM\")"), 0.5625);
    assert_number(&eval.eval("=TIMEVALUE(\"1 PM\")"), 13.0 / 24.0);
    assert_number(&eval.eval("=TIMEVALUE(\"12:00 AM\")"), 0.0);
    assert_time(&eval, "=TIMEVALUE(\"18:50:01\")", "18:50:01");
}

#[test]
fn timevalue_rejects_non_time_input() {
    let eval = TestEval::new();
    assert_eq!(eval.eval("=TIMEVALUE(\"nope\")"), Value::Error(ErrorKind::Value));
    assert_eq!(eval.eval("=TIMEVALUE(\"13:00 PM\")"), Value::Error(ErrorKind::Value));
    assert_eq!(eval.eval("=TIMEVALUE(0.5)"), Value::Error(ErrorKind::Value));
    assert_eq!(eval.eval("=TIMEVALUE(#NUM!)"), Value::Error(ErrorKind::Num));
}

#[test]
fn rendered_time_parses_back_to_the_same_serial() {
    let eval = TestEval::new();
    for formula in ["=TIME(18,49,61)", "=TIME(32767,49,61)", "=TIME(0,0,0)", "=TIME(23,59,59)"] {
        let value = eval.eval(formula);
        let text = eval.display(&value, "hh:mm:ss");
        assert_eq!(eval.eval(&format!("=TIMEVALUE(\"{text}\")")), value, "{formula}");
    }
}

#[test]
fn locale_separators_apply_to_display_and_parsing() {
    let mut eval = TestEval::new();
    eval.set_locale(Locale::fi_fi());
    let value = eval.eval("=TIME(18,49,1)");
    assert_eq!(eval.display(&value, "hh:mm:ss"), "18.49.01");
    assert_eq!(eval.eval("=TIMEVALUE(\"18.49.01\")"), value);

    let mut eval = TestEval::new();
    eval.set_value_locale(ValueLocaleConfig::de_de());
    assert_time(&eval, "=TIME(\"6,5\",0,0)", "06:00:00");
}
