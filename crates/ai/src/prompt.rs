use crate::context::InsightContext;
use crate::error::InsightError;

/// Prompt for a remote summarizer: the product rows as JSON plus the three questions the
/// insights panel answers.
pub fn build_prompt(context: &InsightContext) -> Result<String, InsightError> {
    let rows = serde_json::to_string(&context.rows())
        .map_err(|e| InsightError::InvalidInput(e.to_string()))?;

    Ok(format!(
        "Analyze this inventory data and provide business insights: {rows}.\n\
         Identify:\n\
         1. Items at risk of stockout.\n\
         2. Items that are slow-moving.\n\
         3. Suggestions for batch orders.\n\
         Return the response as a clear, professional summary with actionable bullet points."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextRow, ItemSignals};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn prompt_embeds_camel_case_rows() {
        let context = InsightContext::new(
            vec![ItemSignals::new(ContextRow {
                name: "Almond Milk 1L".to_string(),
                sku: "MLK-001".to_string(),
                stock: 45,
                reorder_level: 50,
                expiry: NaiveDate::from_ymd_opt(2024, 3, 25),
                price: 4.5,
            })],
            Utc::now(),
        );

        let prompt = build_prompt(&context).unwrap();
        assert!(prompt.contains(r#""reorderLevel":50"#));
        assert!(prompt.contains(r#""expiry":"2024-03-25""#));
        assert!(prompt.contains("3. Suggestions for batch orders."));
    }
}
