//! Renders parsed sector records back into normalized `.sct2` text.

use super::*;
use crate::geo::{format_latitude, format_longitude};
use itertools::Itertools;

static SECTION_SEPARATOR: &str =
    "\n\n;===============================================================================\n\n";

fn section<I>(sct: &mut String, header: &str, lines: I)
where
    I: IntoIterator<Item = String>,
{
    let mut lines = lines.into_iter().peekable();
    if lines.peek().is_none() {
        return;
    }

    *sct += SECTION_SEPARATOR;
    *sct += header;
    *sct += "\n";
    for line in lines {
        *sct += &line;
        *sct += "\n";
    }
}

fn info_lines(info: &SectorInfo) -> Vec<String> {
    // Values are positional, so stop at the first gap.
    let values = vec![
        info.name.clone(),
        info.default_callsign.clone(),
        info.default_airport.clone(),
        info.centre_lat.map(format_latitude),
        info.centre_lon.map(format_longitude),
        info.nm_per_deg_lat.map(|v| v.to_string()),
        info.nm_per_deg_lon.map(|v| v.to_string()),
        info.magnetic_variation.map(|v| v.to_string()),
        info.scale.map(|v| v.to_string()),
    ];
    values.into_iter().while_some().collect()
}

fn color(color: &Option<String>) -> String {
    color.as_ref().map(|c| format!(" {}", c)).unwrap_or_default()
}

pub fn to_sct(file: &SectorFile) -> String {
    let mut sct = String::new();

    for c in &file.colors {
        sct += &format!("#define {} {}\n", c.name, c.value);
    }

    section(&mut sct, "[INFO]", info_lines(&file.info));

    for (header, kind) in &[("[VOR]", NavaidKind::Vor), ("[NDB]", NavaidKind::Ndb)] {
        section(
            &mut sct,
            header,
            file.navaids.iter().filter(|n| n.kind == *kind).map(|n| {
                format!("{:<4} {} {}", n.identifier, n.frequency, n.position.to_sct())
            }),
        );
    }

    section(
        &mut sct,
        "[AIRPORT]",
        file.airports.iter().map(|a| {
            let class = a.class.map(|c| format!(" {}", Into::<&str>::into(c)));
            format!(
                "{:4} {:7} {}{}",
                a.identifier,
                a.frequency.to_string(),
                a.position.to_sct(),
                class.unwrap_or_default()
            )
        }),
    );

    section(
        &mut sct,
        "[RUNWAY]",
        file.runways.iter().tuples::<(_, _)>().map(|(a, b)| {
            let mut line = format!(
                "{:3} {:3} {:03} {:03} {} {}",
                a.identifier,
                b.identifier,
                a.heading,
                b.heading,
                a.threshold.to_sct(),
                b.threshold.to_sct()
            );
            if let Some(airport) = &a.airport {
                line += &format!(" {}", airport);
                if let Some(name) = &a.airport_name {
                    line += &format!(" {}", name);
                }
            }
            line
        }),
    );

    section(
        &mut sct,
        "[FIXES]",
        file.fixes
            .iter()
            .map(|f| format!("{} {}", f.name, f.position.to_sct())),
    );

    for (header, level) in &[("[HIGH AIRWAY]", AirwayLevel::High), ("[LOW AIRWAY]", AirwayLevel::Low)] {
        section(
            &mut sct,
            header,
            file.airways
                .iter()
                .filter(|a| a.level == *level)
                .map(|a| format!("{} {} {}", a.name, a.start, a.end)),
        );
    }

    for (header, kind) in &[("[SID]", RouteKind::Sid), ("[STAR]", RouteKind::Star)] {
        section(
            &mut sct,
            header,
            file.terminal_routes
                .iter()
                .filter(|r| r.kind == *kind)
                .map(|r| format!("{:26} {} {}", r.name, r.start, r.end)),
        );
    }

    for (header, level) in &[
        ("[ARTCC]", BoundaryLevel::Artcc),
        ("[ARTCC HIGH]", BoundaryLevel::High),
        ("[ARTCC LOW]", BoundaryLevel::Low),
    ] {
        section(
            &mut sct,
            header,
            file.boundaries
                .iter()
                .filter(|b| b.level == *level)
                .map(|b| format!("{} {} {}", b.name, b.start, b.end)),
        );
    }

    section(
        &mut sct,
        "[GEO]",
        file.geo
            .iter()
            .map(|g| format!("{} {}{}", g.start, g.end, color(&g.color))),
    );

    section(
        &mut sct,
        "[REGIONS]",
        file.regions.iter().flat_map(|r| {
            let name = r.name.iter().map(|n| format!("REGIONNAME {}", n));
            let points = r.points.iter().enumerate().map(move |(i, p)| {
                if i == 0 {
                    format!("{} {}", r.color, p.to_sct())
                } else {
                    format!("{:8} {}", "", p.to_sct())
                }
            });
            name.chain(points).collect::<Vec<_>>()
        }),
    );

    section(
        &mut sct,
        "[LABELS]",
        file.labels
            .iter()
            .map(|l| format!("\"{}\" {}{}", l.text, l.position.to_sct(), color(&l.color))),
    );

    sct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_sections_in_order() {
        let file = SectorFile::parse(
            "[FIXES]\nSANAD S031.23.11.000 E151.24.44.640\n[VOR]\nSY 112.100 S033.56.44.000 E151.10.34.000\n",
        );
        let sct = to_sct(&file);
        let vor = sct.find("[VOR]").unwrap();
        let fixes = sct.find("[FIXES]").unwrap();
        assert!(vor < fixes);
        assert!(sct.contains("SY   112.100 S033.56.44.000 E151.10.34.000\n"));
        assert!(!sct.contains("[NDB]"));
    }

    #[test]
    fn info_stops_at_first_gap() {
        let info = SectorInfo {
            name: Some("Sydney".to_owned()),
            default_callsign: Some("SY_OBS".to_owned()),
            nm_per_deg_lat: Some(60.0),
            ..SectorInfo::default()
        };
        assert_eq!(info_lines(&info), vec!["Sydney", "SY_OBS"]);
    }
}
