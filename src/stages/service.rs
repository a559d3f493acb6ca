use crate::error::{StreelityError, StreelityResult};
use crate::params::{parse_float, Params};
use crate::pipeline::{Record, Stage};

/// Validation for adding a new service, chained with location parsing
///
/// # Params
/// - `location` (2 values, lat then lon), `address` - required
/// - `note`, `images` - optional
///
/// # Fields
/// `Address`, `Note` (empty when not given), one `Images` entry per image, then
/// `Lat` and `Lon` from the successor stage.
pub fn adding_service_validate(params: &Params) -> Stage<'_> {
    let validate = Stage::labelled("validate service", move || -> StreelityResult<Record> {
        params.required_pair("location")?;
        let address = params.required_first("address")?;

        let note = params.first("note").unwrap_or_default();
        let images = params.get("images").unwrap_or_default();
        Ok(Record::new()
            .with("Address", address)
            .with("Note", note)
            .with_strings("Images", images.iter().cloned()))
    });

    validate.with_successor(adding_service_parse(params))
}

/// Parses `location` into `Lat` and `Lon`
pub fn adding_service_parse(params: &Params) -> Stage<'_> {
    Stage::labelled("parse location", move || -> StreelityResult<Record> {
        let (lat, lon) = params.required_pair("location")?;
        Ok(Record::new()
            .with("Lat", parse_float("location[0]", lat)?)
            .with("Lon", parse_float("location[1]", lon)?))
    })
}

/// Adds the optional `contributor` on top of [`adding_service_validate`]
pub fn create_service_validate(params: &Params) -> Stage<'_> {
    let mut stage = adding_service_validate(params);
    stage.next(move || -> StreelityResult<Record> {
        let mut record = Record::new();
        if let Some(contributor) = params.first("contributor") {
            record.push("Contributor", contributor);
        }
        Ok(record)
    });
    stage
}

/// Requires a non-empty `name`, contributed as `Name`
pub fn name_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate name", move || -> StreelityResult<Record> {
        let name = params.required_first("name")?;
        if name.trim().is_empty() {
            return Err(StreelityError::InvalidParam(
                "name param must not be empty".to_string(),
            ));
        }
        Ok(Record::new().with("Name", name))
    })
}

/// Validation for an in-range query, chained with float parsing
///
/// # Params
/// `lat`, `lon`, `range` - all required
///
/// # Fields
/// `Lat`, `Lon`, `Range`
pub fn in_range_validate(params: &Params) -> Stage<'_> {
    let validate = Stage::labelled("validate range query", move || -> StreelityResult<()> {
        for name in ["lat", "lon", "range"] {
            params.required_first(name)?;
        }
        Ok(())
    });

    let parse = Stage::labelled("parse range query", move || -> StreelityResult<Record> {
        Ok(Record::new()
            .with("Lat", params.required_float("lat")?)
            .with("Lon", params.required_float("lon")?)
            .with("Range", params.required_float("range")?))
    });

    validate.with_successor(parse)
}

/// Resolves how a single service is being looked up
///
/// Tries `id`, then a parseable `lat`/`lon` pair, then `address`, and
/// records which one matched in `Case` (1, 2 or 3).
pub fn query_service_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate service query", move || -> StreelityResult<Record> {
        if let Some(id) = params.first("id") {
            let id = id
                .parse::<i64>()
                .map_err(|_| StreelityError::malformed("id", "int"))?;
            return Ok(Record::new().with("Id", id).with("Case", 1));
        }

        // An unparseable coordinate pair falls through to the address lookup
        if let (Ok(lat), Ok(lon)) = (params.required_float("lat"), params.required_float("lon")) {
            return Ok(Record::new()
                .with("Lat", lat)
                .with("Lon", lon)
                .with("Case", 2));
        }

        match params.first("address") {
            Some(address) => Ok(Record::new().with("Address", address).with("Case", 3)),
            None => Err(StreelityError::InvalidParam(
                "required at least one param id / lat - lon / address".to_string(),
            )),
        }
    })
}

/// Requires an integer `id`, contributed as `Id`
pub fn id_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate id", move || -> StreelityResult<Record> {
        Ok(Record::new().with("Id", params.required_int("id")?))
    })
}

/// Listing services by address: `Address`
pub fn query_services_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate services query", move || -> StreelityResult<Record> {
        Ok(Record::new().with("Address", params.required_first("address")?))
    })
}

/// Marks an existing service as updated: `Id`
pub fn update_service_validate(params: &Params) -> Stage<'_> {
    Stage::labelled("validate service update", move || -> StreelityResult<Record> {
        Ok(Record::new().with("Id", params.required_int("id")?))
    })
}

pub fn add_maintainer_validate(params: &Params) -> Stage<'_> {
    maintainer_validate("validate add maintainer", params)
}

pub fn remove_maintainer_validate(params: &Params) -> Stage<'_> {
    maintainer_validate("validate remove maintainer", params)
}

/// `service_id` and `maintainer`, contributed as `ServiceId` and `Maintainer`
fn maintainer_validate<'a>(label: &'static str, params: &'a Params) -> Stage<'a> {
    Stage::labelled(label, move || -> StreelityResult<Record> {
        params.required_first("service_id")?;
        let maintainer = params.required_first("maintainer")?;

        Ok(Record::new()
            .with("ServiceId", params.required_int("service_id")?)
            .with("Maintainer", maintainer))
    })
}

/// Bulk import: the `type` query param, contributed as `Type`
pub fn import_validate(query: &Params) -> Stage<'_> {
    Stage::labelled("validate import", move || -> StreelityResult<Record> {
        Ok(Record::new().with("Type", query.required_first("type")?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;

    fn run(stage: Stage<'_>) -> (StreelityResult<()>, Pipeline<'_>) {
        let mut pipeline = Pipeline::builder("test").first(stage).build();
        let result = pipeline.run();
        (result, pipeline)
    }

    #[test]
    fn test_adding_service_success() {
        let params = Params::from_query(
            "location=10.5&location=106.7&address=1%20Le%20Loi&note=24h&images=a.png&images=b.png",
        );
        let (result, pipeline) = run(adding_service_validate(&params));

        assert!(result.is_ok());
        assert_eq!(pipeline.get_string_first_or_default("Address"), "1 Le Loi");
        assert_eq!(pipeline.get_string_first_or_default("Note"), "24h");
        assert_eq!(pipeline.get_string("Images"), vec!["a.png", "b.png"]);
        assert_eq!(pipeline.get_float_first_or_default("Lat"), 10.5);
        assert_eq!(pipeline.get_float_first_or_default("Lon"), 106.7);
    }

    #[test]
    fn test_adding_service_optional_fields() {
        let params = Params::from_query("location=1&location=2&address=x");
        let (result, pipeline) = run(adding_service_validate(&params));

        assert!(result.is_ok());
        assert_eq!(pipeline.get_string("Note"), vec![""]);
        assert_eq!(pipeline.try_get_string("Note").as_deref(), Some(""));
        assert!(pipeline.get_string("Images").is_empty());
    }

    #[test]
    fn test_adding_service_location_errors() {
        let missing = Params::from_query("address=x");
        let (result, _) = run(adding_service_validate(&missing));
        assert_eq!(result.unwrap_err().to_string(), "location param is missing");

        let single = Params::from_query("location=1&address=x");
        let (result, _) = run(adding_service_validate(&single));
        assert_eq!(
            result.unwrap_err().to_string(),
            "location param must have 2 values"
        );

        let no_address = Params::from_query("location=1&location=2");
        let (result, _) = run(adding_service_validate(&no_address));
        assert_eq!(result.unwrap_err().to_string(), "address param is missing");
    }

    #[test]
    fn test_adding_service_bad_coordinate() {
        let params = Params::from_query("location=1&location=east&address=x");
        let (result, pipeline) = run(adding_service_validate(&params));

        assert_eq!(
            result.unwrap_err().to_string(),
            "cannot parse location[1] to float"
        );
        // Validation succeeded before parsing failed
        assert_eq!(pipeline.get_string_first_or_default("Address"), "x");
        assert_eq!(pipeline.get_float_first_or_default("Lat"), 0.0);
    }

    #[test]
    fn test_create_service_with_name_branch() {
        let params = Params::from_query(
            "location=1&location=2&address=x&contributor=minh&name=Garage%2024",
        );
        let mut stage = create_service_validate(&params);
        stage.next_stage(name_validate(&params));
        let (result, pipeline) = run(stage);

        assert!(result.is_ok());
        assert_eq!(pipeline.get_string_first_or_default("Name"), "Garage 24");
        assert_eq!(pipeline.get_string_first_or_default("Contributor"), "minh");
        assert_eq!(pipeline.get_float_first_or_default("Lon"), 2.0);
    }

    #[test]
    fn test_name_validate_rejects_blank() {
        let params = Params::from_query("name=%20%20");
        let (result, _) = run(name_validate(&params));
        assert!(matches!(result, Err(StreelityError::InvalidParam(_))));
    }

    #[test]
    fn test_in_range_success() {
        let params = Params::from_query("lat=10.5&lon=20.25&range=3.0");
        let (result, pipeline) = run(in_range_validate(&params));

        assert!(result.is_ok());
        assert_eq!(pipeline.get_float_first_or_default("Lat"), 10.5);
        assert_eq!(pipeline.get_float_first_or_default("Lon"), 20.25);
        assert_eq!(pipeline.get_float_first_or_default("Range"), 3.0);
    }

    #[test]
    fn test_in_range_missing_range() {
        let params = Params::from_query("lat=10.5&lon=20.25");
        let (result, pipeline) = run(in_range_validate(&params));

        let err = result.unwrap_err();
        assert!(matches!(err, StreelityError::MissingParam(ref name) if name == "range"));
        assert_eq!(pipeline.get_float_first_or_default("Lat"), 0.0);
        assert_eq!(pipeline.get_float_first_or_default("Lon"), 0.0);
        assert_eq!(pipeline.get_float_first_or_default("Range"), 0.0);
        assert!(pipeline.get_float("Lat").is_empty());
    }

    #[test]
    fn test_in_range_malformed() {
        let params = Params::from_query("lat=10.5&lon=20.25&range=far");
        let (result, pipeline) = run(in_range_validate(&params));

        assert_eq!(result.unwrap_err().to_string(), "cannot parse range to float");
        assert!(pipeline.store().is_empty());
    }

    #[test]
    fn test_query_service_cases() {
        let by_id = Params::from_query("id=9&lat=1&lon=2");
        let (_, pipeline) = run(query_service_validate(&by_id));
        assert_eq!(pipeline.get_int("Case"), vec![1]);
        assert_eq!(pipeline.get_int_first_or_default("Id"), 9);

        let by_location = Params::from_query("lat=1.5&lon=2.5&address=x");
        let (_, pipeline) = run(query_service_validate(&by_location));
        assert_eq!(pipeline.get_int_first_or_default("Case"), 2);
        assert_eq!(pipeline.get_float_first_or_default("Lon"), 2.5);

        let by_address = Params::from_query("lat=north&lon=2&address=3%20Tran%20Phu");
        let (_, pipeline) = run(query_service_validate(&by_address));
        assert_eq!(pipeline.get_int_first_or_default("Case"), 3);
        assert_eq!(pipeline.get_string_first_or_default("Address"), "3 Tran Phu");
    }

    #[test]
    fn test_query_service_errors() {
        let bad_id = Params::from_query("id=abc");
        let (result, _) = run(query_service_validate(&bad_id));
        assert_eq!(result.unwrap_err().to_string(), "cannot parse id to int");

        let nothing = Params::new();
        let (result, _) = run(query_service_validate(&nothing));
        assert_eq!(
            result.unwrap_err().to_string(),
            "required at least one param id / lat - lon / address"
        );
    }

    #[test]
    fn test_id_validate() {
        let params = Params::from_query("id=12");
        let (result, pipeline) = run(id_validate(&params));
        assert!(result.is_ok());
        assert_eq!(pipeline.get_int_first_or_default("Id"), 12);

        let (result, _) = run(id_validate(&Params::new()));
        assert_eq!(result.unwrap_err().to_string(), "id param is missing");
    }

    #[test]
    fn test_query_services_validate() {
        let params = Params::from_query("address=Quan%201");
        let (result, pipeline) = run(query_services_validate(&params));
        assert!(result.is_ok());
        assert_eq!(pipeline.get_string("Address"), vec!["Quan 1"]);

        let (result, _) = run(query_services_validate(&Params::new()));
        assert_eq!(result.unwrap_err().to_string(), "address param is missing");
    }

    #[test]
    fn test_update_service_validate() {
        let params = Params::from_query("id=31");
        let (result, pipeline) = run(update_service_validate(&params));
        assert!(result.is_ok());
        assert_eq!(pipeline.get_int("Id"), vec![31]);

        let (result, _) = run(update_service_validate(&Params::from_query("name=x")));
        assert_eq!(result.unwrap_err().to_string(), "id param is missing");
    }

    #[test]
    fn test_maintainer_validate() {
        let params = Params::from_query("service_id=4&maintainer=lan");
        for stage in [add_maintainer_validate(&params), remove_maintainer_validate(&params)] {
            let (result, pipeline) = run(stage);
            assert!(result.is_ok());
            assert_eq!(pipeline.get_int_first_or_default("ServiceId"), 4);
            assert_eq!(pipeline.get_string_first_or_default("Maintainer"), "lan");
        }
    }

    #[test]
    fn test_maintainer_validate_missing_params() {
        let no_maintainer = Params::from_query("service_id=4");
        let (result, pipeline) = run(add_maintainer_validate(&no_maintainer));
        assert_eq!(result.unwrap_err().to_string(), "maintainer param is missing");
        assert!(pipeline.store().is_empty());

        let no_service = Params::from_query("maintainer=lan");
        let (result, _) = run(remove_maintainer_validate(&no_service));
        assert_eq!(result.unwrap_err().to_string(), "service_id param is missing");

        let bad_service = Params::from_query("service_id=four&maintainer=lan");
        let (result, _) = run(add_maintainer_validate(&bad_service));
        assert_eq!(result.unwrap_err().to_string(), "cannot parse service_id to int");
    }

    #[test]
    fn test_import_validate() {
        let query = Params::from_query("?type=gas");
        let (result, pipeline) = run(import_validate(&query));
        assert!(result.is_ok());
        assert_eq!(pipeline.get_string("Type"), vec!["gas"]);

        let (result, _) = run(import_validate(&Params::from_query("kind=gas")));
        assert_eq!(result.unwrap_err().to_string(), "type param is missing");
    }
}
