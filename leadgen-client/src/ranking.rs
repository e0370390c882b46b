use shared_types::Company;
use std::cmp::Ordering;

/// Order companies by probability score, best first, and number them 1..=n.
///
/// The sort is stable, so equal scores keep their input order and ranking an
/// already-ranked list with unchanged scores changes nothing.
pub fn rank(mut records: Vec<Company>) -> Vec<Company> {
    records.sort_by(|a, b| {
        b.effective_score()
            .partial_cmp(&a.effective_score())
            .unwrap_or(Ordering::Equal)
    });

    for (index, company) in records.iter_mut().enumerate() {
        company.rank = Some(index as u32 + 1);
    }

    records
}
