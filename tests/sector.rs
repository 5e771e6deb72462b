use netdata::scan;
use netdata::sector::{write, RouteKind, Waypoint};
use netdata::{ParseOutcome, SectorFile, SectorOptionsBuilder};

const FIXES: &str = include_str!("fixtures/fixes.sct2");
const SYDNEY: &str = include_str!("fixtures/sydney.sct2");

fn data_lines(text: &str) -> usize {
    scan::lines(text)
        .filter_map(|(_, raw)| scan::logical_line(raw))
        .filter(|line| scan::header_name(line).is_none())
        .count()
}

#[test]
fn six_fixes_without_errors() {
    let file = SectorFile::parse(FIXES);
    assert!(file.errors.is_empty(), "{:?}", file.errors);
    let names: Vec<_> = file.fixes.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["SANAD", "ADMAR", "TESSI", "APAGI", "HUUGO", "SANEG"]);

    let sanad = file.fixes[0].position;
    assert!((sanad.lat() - -31.38639).abs() < 0.00001, "{}", sanad.lat());
    assert!((sanad.lon() - 151.4124).abs() < 0.00001, "{}", sanad.lon());
}

#[test]
fn info_values_are_positional() {
    let file = SectorFile::parse(FIXES);
    assert_eq!(file.info.name.as_deref(), Some("Brisbane Centre"));
    assert_eq!(file.info.default_airport.as_deref(), Some("YBBN"));
    assert_eq!(file.info.magnetic_variation, Some(11.0));
    assert_eq!(file.info.len(), 9);
}

#[test]
fn parsing_is_idempotent() {
    assert_eq!(SectorFile::parse(SYDNEY), SectorFile::parse(SYDNEY));
    assert_eq!(SectorFile::parse(FIXES), SectorFile::parse(FIXES));
}

#[test]
fn every_data_line_is_a_record_or_an_error() {
    let extra = format!("{}[ARTCC  EXTRA]\nsomething\n", SYDNEY);
    let regions = "[REGIONS]\nREGIONNAME Apron\nREGIONNAME Taxiway\ngrey S033.56.00.000 E151.10.00.000\n[FIXES]\n";
    for text in &[FIXES, SYDNEY, extra.as_str(), regions] {
        let file = SectorFile::parse(text);
        assert_eq!(file.record_count() + file.errors.len(), data_lines(text), "{}", text);
    }

    let broken = "[FIXES]\nSANAD S031.23.11.000\nBOREE S033.12.40.000 E151.30.10.000\nTESSI S030.42.33.500 X152.10.04.000\n";
    let file = SectorFile::parse(broken);
    assert_eq!(file.fixes.len(), 1);
    assert_eq!(file.errors.len(), 2);
    assert_eq!(file.record_count() + file.errors.len(), data_lines(broken));
}

#[test]
fn reads_every_section() {
    let file = SectorFile::parse(SYDNEY);
    assert!(file.errors.is_empty(), "{:?}", file.errors);

    assert_eq!(file.colors.len(), 2);
    assert_eq!(file.vors().count(), 2);
    assert_eq!(file.ndbs().count(), 1);
    assert_eq!(file.airports.len(), 2);
    assert_eq!(file.runways.len(), 4);
    assert_eq!(file.fixes.len(), 2);
    assert_eq!(file.airways.len(), 2);
    assert_eq!(file.boundaries.len(), 1);
    assert_eq!(file.geo[0].color.as_deref(), Some("coast"));
    assert_eq!(file.regions[0].name.as_deref(), Some("Sydney apron"));
    assert_eq!(file.labels[0].text, "Sydney Tower");

    let sids: Vec<_> = file
        .terminal_routes
        .iter()
        .filter(|r| r.kind == RouteKind::Sid)
        .collect();
    assert_eq!(sids.len(), 2);
    assert!(sids.iter().all(|r| r.name == "YSSY RWY 16R"));

    let star = file
        .terminal_routes
        .iter()
        .find(|r| r.kind == RouteKind::Star)
        .unwrap();
    assert_eq!(star.start, Waypoint::Named("BOREE".to_owned()));
}

#[test]
fn runways_join_the_nearest_airport() {
    let file = SectorFile::parse(SYDNEY);
    let runways: Vec<_> = file.runways_of("YSSY").map(|r| r.identifier.as_str()).collect();
    assert_eq!(runways, vec!["16R", "34L", "07", "25"]);
    assert_eq!(file.runways[1].opposite, "16R");
    assert_eq!(file.runways[1].heading, 335);

    let options = SectorOptionsBuilder::default()
        .runway_association_radius_nm(0.1)
        .build()
        .unwrap();
    let file = SectorFile::parse_with(SYDNEY, &options);
    assert_eq!(file.runways_of("YSSY").count(), 2);
    assert_eq!(file.runways[2].airport, None);
}

#[test]
fn written_file_parses_back() {
    let file = SectorFile::parse(SYDNEY);
    let sct = write::to_sct(&file);
    let again = SectorFile::parse(&sct);

    assert!(again.errors.is_empty(), "{:?}\n{}", again.errors, sct);
    assert_eq!(again.record_count(), file.record_count());
    assert_eq!(again.colors, file.colors);
    assert_eq!(again.info.name, file.info.name);
    assert_eq!(again.runways_of("YSSY").count(), 4);
    assert_eq!(
        again.terminal_routes.iter().map(|r| &r.name).collect::<Vec<_>>(),
        file.terminal_routes.iter().map(|r| &r.name).collect::<Vec<_>>()
    );
    for (a, b) in again.fixes.iter().zip(&file.fixes) {
        assert_eq!(a.name, b.name);
        assert!(a.position.distance_nm(b.position) < 0.001);
    }
}
