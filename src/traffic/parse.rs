use super::*;
use crate::error::LineError;
use crate::result;
use crate::scan::Fields;
use crate::units;
use std::convert::TryFrom;
use tracing::debug;

const PILOT_FIELDS: usize = 11;
const CONTROLLER_FIELDS: usize = 11;
const NOTIFICATION_FIELDS: usize = 15;
const SERVER_FIELDS: usize = 6;

const PILOT_PLAN: usize = 11;
const NOTIFICATION_PLAN: usize = 4;
const ATIS: usize = 11;

pub(super) fn parse(text: &str) -> TrafficFeed {
    let mut feed = TrafficFeed::default();
    let errors = result::drive(text, |line| entry(&mut feed, line));
    feed.errors = errors;

    debug!(
        pilots = feed.pilots.len(),
        controllers = feed.controllers.len(),
        errors = feed.errors.len(),
        "parsed traffic feed"
    );
    feed
}

fn entry(feed: &mut TrafficFeed, line: &str) -> Result<(), LineError> {
    if line.starts_with('!') {
        return Ok(());
    }

    if let Some(setting) = setting(line) {
        feed.general.push(setting);
        return Ok(());
    }

    let fields = Fields::colon(line);
    match &*fields[0].to_ascii_uppercase() {
        "PILOT" => feed.pilots.push(pilot(fields.require(PILOT_FIELDS)?)?),
        "ATC" => feed.controllers.push(controller(fields.require(CONTROLLER_FIELDS)?)?),
        "PREFILE" => feed
            .notifications
            .push(notification(fields.require(NOTIFICATION_FIELDS)?)?),
        "SERVER" => feed.servers.push(server(fields.require(SERVER_FIELDS)?)?),
        _ => {
            return Err(LineError::InvalidClientType {
                client_type: fields[0].to_owned(),
            })
        }
    }
    Ok(())
}

/// `KEY = VALUE`, as long as no colon comes before the `=`.
fn setting(line: &str) -> Option<FeedSetting> {
    let split = line.find('=')?;
    if line[..split].contains(':') {
        return None;
    }
    Some(FeedSetting {
        key: line[..split].trim().to_owned(),
        value: line[split + 1..].trim().to_owned(),
    })
}

fn incomplete(record: &'static str, err: impl fmt::Display) -> LineError {
    LineError::Incomplete {
        record,
        detail: err.to_string(),
    }
}

// Feeds print the code as a number and drop its leading zeros.
fn squawk(raw: Option<&str>) -> Result<Option<SquawkCode>, LineError> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let code = match raw.parse::<u16>() {
        Ok(number) => SquawkCode::try_from(number)?,
        Err(_) => raw.parse()?,
    };
    Ok(Some(code))
}

fn pilot(fields: Fields<'_>) -> Result<Pilot, LineError> {
    let mut pilot = PilotBuilder::default();
    if let Some(callsign) = fields.optional(1) {
        pilot.callsign(callsign);
    }
    if let Some(cid) = fields.optional(2) {
        pilot.cid(cid);
    }
    pilot
        .name(fields[3])
        .position(LatLon::from_decimal(fields[4], fields[5])?)
        .altitude(Altitude::from_optional(fields.optional(6))?)
        .groundspeed(units::number::<u32>("groundspeed", fields[7])?)
        .heading(units::heading(fields[8])?)
        .squawk(squawk(fields.optional(9))?)
        .server(fields[10])
        .flight_plan(flight_plan(&fields, PILOT_PLAN)?);

    pilot.build().map_err(|e| incomplete("pilot", e))
}

fn controller(fields: Fields<'_>) -> Result<AirTrafficController, LineError> {
    let facility = fields[5].parse::<Facility>()?;

    let mut controller = AirTrafficControllerBuilder::default();
    if let Some(callsign) = fields.optional(1) {
        controller.callsign(callsign);
    }
    if let Some(cid) = fields.optional(2) {
        controller.cid(cid);
    }
    controller
        .name(fields[3])
        .frequency(fields[4].parse::<Frequency>()?)
        .facility(facility)
        .rating(units::number::<u8>("rating", fields[6])?)
        .position(LatLon::from_decimal(fields[7], fields[8])?)
        .visual_range(units::number::<u32>("visual range", fields[9])?)
        .server(fields[10])
        .atis(atis(&fields.rest(ATIS, ":")));

    controller.build().map_err(|e| incomplete("controller", e))
}

/// Splits ATIS text into its lines. Newer feeds separate them with `^§`,
/// older ones with a bare `^`.
fn atis(text: &str) -> Vec<String> {
    text.split("^§")
        .flat_map(|part| part.split('^'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn notification(fields: Fields<'_>) -> Result<FlightNotification, LineError> {
    let callsign = fields.optional(1).ok_or_else(|| LineError::Incomplete {
        record: "flight notification",
        detail: "missing callsign".to_owned(),
    })?;
    let flight_plan =
        flight_plan(&fields, NOTIFICATION_PLAN)?.ok_or_else(|| LineError::Incomplete {
            record: "flight notification",
            detail: "empty flight plan".to_owned(),
        })?;

    Ok(FlightNotification {
        callsign: callsign.to_owned(),
        cid: fields[2].to_owned(),
        name: fields[3].to_owned(),
        flight_plan,
    })
}

/// The eleven plan fields starting at `at`; the route takes whatever is
/// left. `None` when every plan field is empty.
fn flight_plan(fields: &Fields<'_>, at: usize) -> Result<Option<FlightPlan>, LineError> {
    if fields.slice(at, fields.len()).iter().all(|f| f.is_empty()) {
        return Ok(None);
    }

    let field = |i: usize| fields.optional(at + i);
    let mut plan = FlightPlanBuilder::default();
    if let Some(departure) = field(2) {
        plan.departure(departure);
    }
    if let Some(destination) = field(4) {
        plan.destination(destination);
    }
    if let Some(rules) = field(5) {
        let rules = FlightRules::from_letter(rules).ok_or_else(|| LineError::InvalidValue {
            field: "flight rules",
            raw: rules.to_owned(),
        })?;
        plan.rules(rules);
    }

    plan.aircraft(field(0).unwrap_or_default())
        .true_airspeed(
            field(1)
                .map(|tas| units::number::<u32>("true airspeed", tas))
                .transpose()?,
        )
        .cruise_altitude(field(3).map(str::parse::<Altitude>).transpose()?)
        .departure_time(field(6).unwrap_or_default())
        .enroute_time(field(7).unwrap_or_default())
        .alternate(field(8).unwrap_or_default())
        .remarks(field(9).unwrap_or_default())
        .route(fields.rest(at + 10, ":"));

    plan.build()
        .map(Some)
        .map_err(|e| incomplete("flight plan", e))
}

fn server(fields: Fields<'_>) -> Result<Server, LineError> {
    let clients_allowed = match &*fields[5].to_ascii_lowercase() {
        "1" | "true" => true,
        "0" | "false" => false,
        _ => {
            return Err(LineError::InvalidValue {
                field: "clients allowed",
                raw: fields[5].to_owned(),
            })
        }
    };

    Ok(Server {
        ident: fields[1].to_owned(),
        hostname: fields[2].to_owned(),
        location: fields[3].to_owned(),
        name: fields[4].to_owned(),
        clients_allowed,
    })
}
