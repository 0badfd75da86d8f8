use omc_scripting::codec::{
    Dimension, EnumerationType, EnumerationValue, Shape, Value, ValueType, decode_value,
    encode_value,
};
use omc_scripting::grammar::{Identifier, QualifiedName};

/// Encode `value`, decode the text with the same schema, and expect `value` back.
fn assert_reads_back(value: Value, ty: &ValueType, shape: &Shape) {
    let text = encode_value("v", value.clone(), ty, shape).unwrap();
    let decoded = decode_value(&text, ty, shape)
        .unwrap_or_else(|e| panic!("{} did not decode: {}", text, e));
    assert_eq!(decoded, value, "through {}", text);
}

fn access() -> ValueType {
    EnumerationType::new("OpenModelica.Scripting.Access", &["hide", "icon", "all"])
        .unwrap()
        .into()
}

fn member(name: &str, ordinal: usize) -> Value {
    Value::Enumeration(EnumerationValue {
        type_name: QualifiedName::parse("OpenModelica.Scripting.Access").unwrap(),
        member: Identifier::new(name).unwrap(),
        ordinal,
    })
}

#[test]
fn test_scalars_read_back() {
    let s = Shape::scalar();
    for r in [0.0, 1.5, -0.25, 1e-8, 6.02e23, f64::MAX] {
        assert_reads_back(Value::Real(r), &ValueType::Real, &s);
    }
    for i in [0, -7, i64::MAX] {
        assert_reads_back(Value::Integer(i), &ValueType::Integer, &s);
    }
    assert_reads_back(Value::Boolean(true), &ValueType::Boolean, &s);
    assert_reads_back(Value::Boolean(false), &ValueType::Boolean, &s);
    for text in ["", "plain", "quote \" and \\ and\nnewline", "tab\tbell\u{7}?"] {
        assert_reads_back(Value::from(text), &ValueType::String, &s);
    }
    assert_reads_back(member("icon", 2), &access(), &s);
    let name = QualifiedName::parse("Modelica.Blocks.'quoted name'").unwrap();
    assert_reads_back(Value::Name(name), &ValueType::TypeName, &s);
}

#[test]
fn test_arrays_read_back() {
    let vector = Shape::new(vec![Dimension::Fixed(3)]);
    assert_reads_back(Value::from(vec![1.0, -2.5, 3e10]), &ValueType::Real, &vector);
    let members = Value::Array(vec![member("all", 3), member("hide", 1), member("all", 3)]);
    assert_reads_back(members, &access(), &vector);

    let open = Shape::new(vec![Dimension::Unbounded]);
    assert_reads_back(Value::Array(vec![]), &ValueType::String, &open);
    assert_reads_back(Value::from(vec!["a", "b"]), &ValueType::String, &open);

    let rows = Shape::new(vec![Dimension::Unbounded, Dimension::Fixed(2)]);
    let matrix = Value::from(vec![vec![1i64, 2], vec![3, 4], vec![5, 6]]);
    assert_reads_back(matrix, &ValueType::Integer, &rows);

    let columns = Shape::new(vec![Dimension::Fixed(2), Dimension::Unbounded]);
    let flags = Value::from(vec![vec![true], vec![false]]);
    assert_reads_back(flags, &ValueType::Boolean, &columns);
}
