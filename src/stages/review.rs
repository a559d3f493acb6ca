use crate::error::{StreelityError, StreelityResult};
use crate::params::Params;
use crate::pipeline::{Record, Stage};

/// Validation for posting a review
///
/// Every param is checked for presence before any is parsed, so a request
/// missing several params reports the first missing one in this order:
/// `service_id`, `commenter`, `score`, `body`.
///
/// # Fields
/// `ServiceId`, `Commenter` (integers), `Score` (float), `Body`
///
/// Scores are stored as single-precision by the review store, so finite
/// values outside the `f32` range are rejected as malformed.
pub fn review_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate review", move || -> StreelityResult<Record> {
        for name in ["service_id", "commenter", "score", "body"] {
            params.required_first(name)?;
        }

        Ok(Record::new()
            .with("ServiceId", params.required_int("service_id")?)
            .with("Commenter", params.required_int("commenter")?)
            .with("Score", score(params)?)
            .with("Body", params.required_first("body")?))
    })
}

fn score(params: &Params) -> StreelityResult<f64> {
    let score = params.required_float("score")?;
    if score.is_finite() && score.abs() > f64::from(f32::MAX) {
        return Err(StreelityError::malformed("score", "float"));
    }
    Ok(score)
}

/// Paging through the reviews of one service
///
/// The service is passed as `review_id`; it is contributed as `ServiceId`
/// together with `Order`.
pub fn review_by_order_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate review order", move || -> StreelityResult<Record> {
        params.required_first("review_id")?;
        params.required_first("order")?;

        Ok(Record::new()
            .with("ServiceId", params.required_int("review_id")?)
            .with("Order", params.required_int("order")?))
    })
}

/// Validation for editing a review body: `ReviewId`, `NewBody`
pub fn update_review_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate review update", move || -> StreelityResult<Record> {
        params.required_first("review_id")?;
        let new_body = params.required_first("new_body")?;

        Ok(Record::new()
            .with("ReviewId", params.required_int("review_id")?)
            .with("NewBody", new_body))
    })
}

pub fn review_id_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate review id", move || -> StreelityResult<Record> {
        Ok(Record::new().with("ReviewId", params.required_int("review_id")?))
    })
}
