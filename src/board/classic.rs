//! The standard map.
//!
//! 75 provinces (19 seas, 56 land), 34 supply centers, and split coasts for
//! Spain, St. Petersburg, and Bulgaria. Provinces are named by their usual
//! three-letter abbreviations; split coasts are `spa/nc`, `spa/sc`, and so on,
//! and every other coastal province has a coast named `"<abbr> coast"`.

use super::builder::{BoardBuilder, BoardError};
use super::province::ProvinceType;
use super::state::Board;
use super::unit::UnitType;

pub const PLAYERS: [&str; 7] = ["Austria", "England", "France", "Germany", "Italy", "Russia", "Turkey"];

const SEAS: [&str; 19] = [
    "adr", "aeg", "bal", "bar", "bla", "bot", "eas", "eng", "gol", "hel", "ion", "iri", "mao",
    "nao", "nrg", "nth", "ska", "tys", "wes",
];

const SUPPLY_CENTERS: [&str; 34] = [
    "ank", "bel", "ber", "bre", "bud", "bul", "con", "den", "edi", "gre", "hol", "kie", "lon",
    "lvp", "mar", "mos", "mun", "nap", "nwy", "par", "por", "rom", "rum", "ser", "sev", "smy",
    "spa", "stp", "swe", "tri", "tun", "ven", "vie", "war",
];

/// Each province with its neighbours. Listed in both directions.
const ADJACENCY: [(&str, &[&str]); 75] = [
    ("adr", &["alb", "apu", "ion", "tri", "ven"]),
    ("aeg", &["bul", "con", "eas", "gre", "ion", "smy"]),
    ("alb", &["adr", "gre", "ion", "ser", "tri"]),
    ("ank", &["arm", "bla", "con", "smy"]),
    ("apu", &["adr", "ion", "nap", "rom", "ven"]),
    ("arm", &["ank", "bla", "sev", "smy", "syr"]),
    ("bal", &["ber", "bot", "den", "kie", "lvn", "pru", "swe"]),
    ("bar", &["nrg", "nwy", "stp"]),
    ("bel", &["bur", "eng", "hol", "nth", "pic", "ruh"]),
    ("ber", &["bal", "kie", "mun", "pru", "sil"]),
    ("bla", &["ank", "arm", "bul", "con", "rum", "sev"]),
    ("boh", &["gal", "mun", "sil", "tyr", "vie"]),
    ("bot", &["bal", "fin", "lvn", "stp", "swe"]),
    ("bre", &["eng", "gas", "mao", "par", "pic"]),
    ("bud", &["gal", "rum", "ser", "tri", "vie"]),
    ("bul", &["aeg", "bla", "con", "gre", "rum", "ser"]),
    ("bur", &["bel", "gas", "mar", "mun", "par", "pic", "ruh"]),
    ("cly", &["edi", "lvp", "nao", "nrg"]),
    ("con", &["aeg", "ank", "bla", "bul", "smy"]),
    ("den", &["bal", "hel", "kie", "nth", "ska", "swe"]),
    ("eas", &["aeg", "ion", "smy", "syr"]),
    ("edi", &["cly", "lvp", "nrg", "nth", "yor"]),
    ("eng", &["bel", "bre", "iri", "lon", "mao", "nth", "pic", "wal"]),
    ("fin", &["bot", "nwy", "stp", "swe"]),
    ("gal", &["boh", "bud", "rum", "sil", "ukr", "vie", "war"]),
    ("gas", &["bre", "bur", "mao", "mar", "par", "spa"]),
    ("gol", &["mar", "pie", "spa", "tus", "tys", "wes"]),
    ("gre", &["aeg", "alb", "bul", "ion", "ser"]),
    ("hel", &["den", "hol", "kie", "nth"]),
    ("hol", &["bel", "hel", "kie", "nth", "ruh"]),
    ("ion", &["adr", "aeg", "alb", "apu", "eas", "gre", "nap", "tun", "tys"]),
    ("iri", &["eng", "lvp", "mao", "nao", "wal"]),
    ("kie", &["bal", "ber", "den", "hel", "hol", "mun", "ruh"]),
    ("lon", &["eng", "nth", "wal", "yor"]),
    ("lvn", &["bal", "bot", "mos", "pru", "stp", "war"]),
    ("lvp", &["cly", "edi", "iri", "nao", "wal", "yor"]),
    ("mao", &["bre", "eng", "gas", "iri", "nao", "naf", "por", "spa", "wes"]),
    ("mar", &["bur", "gas", "gol", "pie", "spa"]),
    ("mos", &["lvn", "sev", "stp", "ukr", "war"]),
    ("mun", &["ber", "boh", "bur", "kie", "ruh", "sil", "tyr"]),
    ("naf", &["mao", "tun", "wes"]),
    ("nao", &["cly", "iri", "lvp", "mao", "nrg"]),
    ("nap", &["apu", "ion", "rom", "tys"]),
    ("nrg", &["bar", "cly", "edi", "nao", "nth", "nwy"]),
    ("nth", &["bel", "den", "edi", "eng", "hel", "hol", "lon", "nrg", "nwy", "ska", "yor"]),
    ("nwy", &["bar", "fin", "nrg", "nth", "ska", "stp", "swe"]),
    ("par", &["bre", "bur", "gas", "pic"]),
    ("pic", &["bel", "bre", "bur", "eng", "par"]),
    ("pie", &["gol", "mar", "tus", "tyr", "ven"]),
    ("por", &["mao", "spa"]),
    ("pru", &["bal", "ber", "lvn", "sil", "war"]),
    ("rom", &["apu", "nap", "tus", "tys", "ven"]),
    ("ruh", &["bel", "bur", "hol", "kie", "mun"]),
    ("rum", &["bla", "bud", "bul", "gal", "ser", "sev", "ukr"]),
    ("ser", &["alb", "bud", "bul", "gre", "rum", "tri"]),
    ("sev", &["arm", "bla", "mos", "rum", "ukr"]),
    ("sil", &["ber", "boh", "gal", "mun", "pru", "war"]),
    ("ska", &["den", "nth", "nwy", "swe"]),
    ("smy", &["aeg", "ank", "arm", "con", "eas", "syr"]),
    ("spa", &["gas", "gol", "mao", "mar", "por", "wes"]),
    ("stp", &["bar", "bot", "fin", "lvn", "mos", "nwy"]),
    ("swe", &["bal", "bot", "den", "fin", "nwy", "ska"]),
    ("syr", &["arm", "eas", "smy"]),
    ("tri", &["adr", "alb", "bud", "ser", "tyr", "ven", "vie"]),
    ("tun", &["ion", "naf", "tys", "wes"]),
    ("tus", &["gol", "pie", "rom", "tys", "ven"]),
    ("tyr", &["boh", "mun", "pie", "tri", "ven", "vie"]),
    ("tys", &["gol", "ion", "nap", "rom", "tun", "tus", "wes"]),
    ("ukr", &["gal", "mos", "rum", "sev", "war"]),
    ("ven", &["adr", "apu", "pie", "rom", "tri", "tus", "tyr"]),
    ("vie", &["boh", "bud", "gal", "tri", "tyr"]),
    ("wal", &["eng", "iri", "lon", "lvp", "yor"]),
    ("war", &["gal", "lvn", "mos", "pru", "sil", "ukr"]),
    ("wes", &["gol", "mao", "naf", "spa", "tun", "tys"]),
    ("yor", &["edi", "lon", "lvp", "nth", "wal"]),
];

const SPLIT_COASTS: [(&str, &str, &[&str]); 6] = [
    ("spa", "spa/nc", &["mao"]),
    ("spa", "spa/sc", &["gol", "mao", "wes"]),
    ("stp", "stp/nc", &["bar"]),
    ("stp", "stp/sc", &["bot"]),
    ("bul", "bul/ec", &["bla"]),
    ("bul", "bul/sc", &["aeg"]),
];

/// Gascony and the south coast of Spain both touch the Mid-Atlantic but do
/// not share a shoreline.
const SEVERED_COASTS: [(&str, &str); 1] = [("gas coast", "spa/sc")];

/// Home centers, in player order.
const HOME_CENTERS: [(&str, &[&str]); 7] = [
    ("Austria", &["bud", "tri", "vie"]),
    ("England", &["edi", "lon", "lvp"]),
    ("France", &["bre", "mar", "par"]),
    ("Germany", &["ber", "kie", "mun"]),
    ("Italy", &["nap", "rom", "ven"]),
    ("Russia", &["mos", "sev", "stp", "war"]),
    ("Turkey", &["ank", "con", "smy"]),
];

const STARTING_UNITS: [(&str, UnitType, &str); 22] = [
    ("Austria", UnitType::Army, "vie"),
    ("Austria", UnitType::Army, "bud"),
    ("Austria", UnitType::Fleet, "tri"),
    ("England", UnitType::Fleet, "lon"),
    ("England", UnitType::Fleet, "edi"),
    ("England", UnitType::Army, "lvp"),
    ("France", UnitType::Fleet, "bre"),
    ("France", UnitType::Army, "par"),
    ("France", UnitType::Army, "mar"),
    ("Germany", UnitType::Fleet, "kie"),
    ("Germany", UnitType::Army, "ber"),
    ("Germany", UnitType::Army, "mun"),
    ("Italy", UnitType::Fleet, "nap"),
    ("Italy", UnitType::Army, "rom"),
    ("Italy", UnitType::Army, "ven"),
    ("Russia", UnitType::Fleet, "stp/sc"),
    ("Russia", UnitType::Army, "mos"),
    ("Russia", UnitType::Army, "war"),
    ("Russia", UnitType::Fleet, "sev"),
    ("Turkey", UnitType::Fleet, "ank"),
    ("Turkey", UnitType::Army, "con"),
    ("Turkey", UnitType::Army, "smy"),
];

fn describe() -> Result<Board, BoardError> {
    let mut b = BoardBuilder::new();
    for name in PLAYERS {
        b.add_player(name)?;
    }
    for (name, _) in ADJACENCY {
        let province_type = if SEAS.contains(&name) {
            ProvinceType::Sea
        } else {
            ProvinceType::Land
        };
        b.add_province(name, province_type, SUPPLY_CENTERS.contains(&name))?;
    }
    for (name, neighbours) in ADJACENCY {
        for other in neighbours {
            b.connect(name, other)?;
        }
    }
    for (province, coast, seas) in SPLIT_COASTS {
        b.add_coast(province, coast, seas)?;
    }
    for (a, c) in SEVERED_COASTS {
        b.sever_coasts(a, c);
    }
    b.build()
}

fn populate(board: &mut Board) -> Result<(), BoardError> {
    for (player, centers) in HOME_CENTERS {
        let pid = board
            .player_id(player)
            .ok_or_else(|| BoardError::UnknownPlayer(player.to_string()))?;
        for center in centers {
            let id = board
                .province_id(center)
                .ok_or_else(|| BoardError::UnknownProvince(center.to_string()))?;
            let p = board.province_mut(id);
            p.core = Some(pid);
            p.owner = Some(pid);
        }
    }
    for (player, unit_type, at) in STARTING_UNITS {
        let pid = board
            .player_id(player)
            .ok_or_else(|| BoardError::UnknownPlayer(player.to_string()))?;
        let location = board
            .location(at)
            .ok_or_else(|| BoardError::UnknownProvince(at.to_string()))?;
        board.add_unit(pid, unit_type, location)?;
    }
    Ok(())
}

/// Builds the standard map with no units on it.
pub fn classic_board() -> Result<Board, BoardError> {
    describe()
}

/// Builds the standard map in its opening position: 22 units, home centers
/// owned and cored.
pub fn classic_starting_board() -> Result<Board, BoardError> {
    let mut board = describe()?;
    populate(&mut board)?;
    Ok(board)
}
