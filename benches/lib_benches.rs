use criterion::{black_box, criterion_group, criterion_main, Criterion};
use decimal96::Decimal;
use num_traits::FromPrimitive;
use std::str::FromStr;

macro_rules! bench_decimal_op {
    ($c:ident, $name:literal, $op:tt, $y:literal) => {
        $c.bench_function($name, |b| {
            let x = Decimal::from_str("2.01").unwrap();
            let y = Decimal::from_str($y).unwrap();
            b.iter(|| black_box(black_box(x) $op black_box(y)));
        });
    };
}

fn bench_add(c: &mut Criterion) {
    bench_decimal_op!(c, "add_one", +, "1");
    bench_decimal_op!(c, "add_point_zero_one", +, "0.01");
    bench_decimal_op!(c, "add_negative_point_five", +, "-0.5");
    bench_decimal_op!(c, "add_pi", +, "3.1415926535897932384626433832");

    c.bench_function("sum_10k", |b| {
        let values: Vec<Decimal> = (0..10_000i64).map(|i| Decimal::new(i, 2)).collect();
        b.iter(|| black_box(values.iter().sum::<Decimal>()));
    });
}

fn bench_sub(c: &mut Criterion) {
    bench_decimal_op!(c, "sub_one", -, "1");
    bench_decimal_op!(c, "sub_point_zero_one", -, "0.01");
    bench_decimal_op!(c, "sub_negative_pi", -, "-3.1415926535897932384626433832");
}

fn bench_mul(c: &mut Criterion) {
    bench_decimal_op!(c, "mul_two", *, "2");
    bench_decimal_op!(c, "mul_point_zero_one", *, "0.01");
    bench_decimal_op!(c, "mul_pi", *, "3.1415926535897932384626433832");
}

fn bench_div(c: &mut Criterion) {
    bench_decimal_op!(c, "div_two", /, "2");
    bench_decimal_op!(c, "div_three", /, "3");
    bench_decimal_op!(c, "div_point_zero_one", /, "0.01");
    bench_decimal_op!(c, "div_pi", /, "3.1415926535897932384626433832");
}

fn bench_rem(c: &mut Criterion) {
    bench_decimal_op!(c, "rem_one", %, "1");
    bench_decimal_op!(c, "rem_point_zero_seven", %, "0.07");
    bench_decimal_op!(c, "rem_pi", %, "3.1415926535897932384626433832");
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_short", |b| {
        b.iter(|| Decimal::from_str(black_box("-123.456")).unwrap());
    });
    c.bench_function("parse_long", |b| {
        b.iter(|| Decimal::from_str(black_box("3.1415926535897932384626433832")).unwrap());
    });
}

fn bench_display(c: &mut Criterion) {
    let value = Decimal::from_str("-79228162514.264337593543950335").unwrap();
    c.bench_function("to_string", |b| b.iter(|| black_box(value).to_string()));
    c.bench_function("to_string_with_precision", |b| {
        b.iter(|| format!("{:.4}", black_box(value)))
    });
}

fn bench_convert(c: &mut Criterion) {
    c.bench_function("from_f64", |b| {
        b.iter(|| Decimal::from_f64(black_box(123_456.789f64)));
    });
    c.bench_function("to_oa_currency", |b| {
        let value = Decimal::from_str("12345.678901").unwrap();
        b.iter(|| black_box(value).to_oa_currency());
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_sub,
    bench_mul,
    bench_div,
    bench_rem,
    bench_parse,
    bench_display,
    bench_convert,
);
criterion_main!(benches);
