use serde_json::{Map, Value};

/// Restrict a serialized record to the selected fields. The identity field
/// is always present; fields the record does not carry are skipped.
pub fn project(record: Value, select: &Option<Vec<String>>) -> Value {
    let Some(fields) = select else {
        return record;
    };
    let Value::Object(obj) = record else {
        return record;
    };

    let mut projected = Map::new();
    if let Some(id) = obj.get("id") {
        projected.insert("id".to_string(), id.clone());
    }
    for field in fields {
        if field == "id" {
            continue;
        }
        if let Some(value) = obj.get(field.as_str()) {
            projected.insert(field.clone(), value.clone());
        }
    }
    Value::Object(projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_selected_fields_and_id() {
        let record = json!({
            "id": "abc",
            "name": "Devworks",
            "description": "Full stack",
            "housing": true
        });
        let select = Some(vec!["name".to_string()]);
        let projected = project(record, &select);
        assert_eq!(projected, json!({ "id": "abc", "name": "Devworks" }));
    }

    #[test]
    fn no_selection_returns_record_unchanged() {
        let record = json!({ "id": "abc", "name": "Devworks" });
        assert_eq!(project(record.clone(), &None), record);
    }

    #[test]
    fn unknown_selected_fields_are_skipped() {
        let record = json!({ "id": "abc", "name": "Devworks" });
        let select = Some(vec!["bogus".to_string(), "name".to_string()]);
        let projected = project(record, &select);
        assert_eq!(projected, json!({ "id": "abc", "name": "Devworks" }));
    }
}
