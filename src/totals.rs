use crate::app::DocumentItem;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Derives subtotal, tax and total from the item rows. Pure; recomputed on
/// every change. Non-finite inputs count as zero.
pub fn compute(items: &[DocumentItem]) -> Totals {
    let mut subtotal = 0.0;
    let mut tax = 0.0;

    for item in items {
        let line = num(item.quantity) * num(item.unit_price);
        subtotal += line;
        if let Some(rate) = item.tax {
            tax += line * num(rate) / 100.0;
        }
    }

    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

fn num(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(quantity: f64, unit_price: f64, tax: Option<f64>) -> DocumentItem {
        DocumentItem {
            quantity,
            unit_price,
            tax,
            ..DocumentItem::default()
        }
    }

    #[test]
    fn worked_example() {
        let items = vec![row(2.0, 10.0, Some(10.0)), row(1.0, 5.0, Some(0.0))];
        let totals = compute(&items);
        assert_eq!(totals.subtotal, 25.0);
        assert_eq!(totals.tax, 2.0);
        assert_eq!(totals.total, 27.0);
    }

    #[test]
    fn independent_of_row_order() {
        let mut items = vec![
            row(3.0, 7.5, Some(8.0)),
            row(1.0, 100.0, None),
            row(0.5, 12.0, Some(2.5)),
        ];
        let forward = compute(&items);
        items.reverse();
        let backward = compute(&items);
        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_rows_contribute_nothing() {
        let items = vec![row(0.0, 0.0, None), row(2.0, 10.0, None)];
        let totals = compute(&items);
        assert_eq!(totals.subtotal, 20.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 20.0);
    }

    #[test]
    fn non_finite_inputs_treated_as_zero() {
        let items = vec![row(f64::NAN, 10.0, None), row(1.0, f64::INFINITY, Some(5.0))];
        let totals = compute(&items);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn no_items_means_zero_totals() {
        assert_eq!(compute(&[]), Totals::default());
    }
}
