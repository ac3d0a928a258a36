use crate::models::RegulationRef;

/// Core regulations offered on the laws tab.
pub const CORE_REGULATIONS: [(&str, &str); 14] = [
    (
        "2011. évi CXC. törvény",
        "A nemzeti köznevelésről (Nkt.) - Alapvető szabályok",
    ),
    (
        "2023. évi LII. törvény",
        "A pedagógusok új életpályájáról (Púétv.) - Jogállás és bér",
    ),
    (
        "18/2024. (IV. 4.) BM rendelet",
        "A pedagógusok teljesítményértékelési rendszeréről (TÉR)",
    ),
    (
        "401/2023. (VIII. 30.) Korm. rendelet",
        "A Púétv. végrehajtásáról - Munkaidő, pótlékok",
    ),
    (
        "20/2012. (VIII. 31.) EMMI rendelet",
        "A nevelési-oktatási intézmények működéséről",
    ),
    (
        "15/2013. (II. 26.) EMMI rendelet",
        "A pedagógiai szakszolgálati intézmények működéséről",
    ),
    (
        "32/2012. (X. 8.) EMMI rendelet",
        "SNI Irányelvek - Autizmus, értelmi fogyatékosság",
    ),
    (
        "33/1998. (VI. 24.) NM rendelet",
        "Munkaköri alkalmassági vizsgálatok",
    ),
    ("1998. évi XXVI. törvény", "A fogyatékos személyek jogairól"),
    (
        "2019. évi LXXX. törvény",
        "A szakképzésről - Szakiskolai alapok",
    ),
    (
        "12/2020. (II. 7.) Korm. rendelet",
        "A szakképzési törvény végrehajtásáról",
    ),
    (
        "363/2012. (XII. 17.) Korm. rendelet",
        "Az Óvodai nevelés országos alapprogramja",
    ),
    (
        "7/2012. (VI. 8.) EMMI rendelet",
        "A Kollégiumi nevelés országos alapprogramja",
    ),
    (
        "110/2012. (VI. 4.) Korm. rendelet",
        "A Nemzeti Alaptanterv (NAT)",
    ),
];

/// One-click questions offered on the knowledge tab.
pub const QUICK_TOPICS: [&str; 5] = [
    "Utazó gyógypedagógusi hálózat feladatai",
    "SNI felülvizsgálat eljárásrendje",
    "EGYMI finanszírozási alapjai",
    "Szakértői vélemények kötelező tartalma",
    "Egyéni fejlesztési tervek (ITP) készítése",
];

/// Quick topic by its 1-based number, as listed to users.
pub fn topic(number: usize) -> Option<&'static str> {
    number.checked_sub(1).and_then(|i| QUICK_TOPICS.get(i)).copied()
}

pub fn catalog() -> Vec<RegulationRef> {
    CORE_REGULATIONS
        .iter()
        .map(|(id, title)| RegulationRef {
            id: (*id).to_string(),
            title: (*title).to_string(),
        })
        .collect()
}

/// Look up a catalog entry by id, ignoring surrounding whitespace and case.
pub fn find(law_id: &str) -> Option<RegulationRef> {
    let wanted = law_id.trim().to_lowercase();
    CORE_REGULATIONS
        .iter()
        .find(|(id, _)| id.to_lowercase() == wanted)
        .map(|(id, title)| RegulationRef {
            id: (*id).to_string(),
            title: (*title).to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let ids: std::collections::HashSet<_> = CORE_REGULATIONS.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), CORE_REGULATIONS.len());
        assert_eq!(catalog().len(), 14);
    }

    #[test]
    fn find_is_whitespace_and_case_insensitive() {
        let found = find("  2011. ÉVI CXC. TÖRVÉNY ").expect("Nkt. is in the catalog");
        assert_eq!(found.id, "2011. évi CXC. törvény");
        assert!(found.title.contains("Nkt."));
        assert!(find("1/1990. rendelet").is_none());
    }

    #[test]
    fn topics_are_numbered_from_one() {
        assert_eq!(topic(1), Some("Utazó gyógypedagógusi hálózat feladatai"));
        assert_eq!(topic(5), Some("Egyéni fejlesztési tervek (ITP) készítése"));
        assert_eq!(topic(0), None);
        assert_eq!(topic(6), None);
    }
}
