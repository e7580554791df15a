use crate::eval::Value;

/// Deterministic content hash of a composite value, used by `eql`.
///
/// Every own enumerable field is visited in enumeration order. Scalars append
/// their key and string form; nested composites append their own hash without a
/// key; callables are skipped. Key order therefore matters. Scalars have no hash.
pub fn content_hash(value: &Value) -> Option<String> {
    if !value.is_composite() {
        return None;
    }
    let mut buffer = String::new();
    write_fields(value, &mut buffer);
    Some(buffer)
}

fn write_fields(value: &Value, buffer: &mut String) {
    for (key, field) in value.fields() {
        if field.is_callable() {
            continue;
        }
        if field.is_composite() {
            write_fields(field, buffer);
        } else {
            buffer.push_str(&key);
            buffer.push_str(&field.stringify());
        }
    }
}
