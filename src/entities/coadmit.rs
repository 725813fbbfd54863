// 🤝 Coadmit Programs - partner community college codes

/// Raw SIS label → platform code
const COADMITS: [(&str, &str); 7] = [
    ("Coadmit - Clackamas CC", "COAD - CLCC"),
    ("Coadmit - Mt Hood CC", "COAD - MHCC"),
    ("Coadmit - Portland CC", "COAD - PCC"),
    ("Coadmit - Chemeketa CC", "COAD - CHMK CC"),
    ("Coadmit - Clatsop CC", "COAD - CCC"),
    ("Coadmit - Clark College", "COAD - CLARK"),
    ("Coadmit - PostBac", "COAD - PostBac"),
];

/// Short code for a coadmit label, `None` when the label is unknown
pub fn coadmit_code(label: &str) -> Option<&'static str> {
    COADMITS
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(coadmit_code("Coadmit - Portland CC"), Some("COAD - PCC"));
        assert_eq!(coadmit_code("Coadmit - Chemeketa CC"), Some("COAD - CHMK CC"));
        assert_eq!(coadmit_code("Coadmit - PostBac"), Some("COAD - PostBac"));
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(coadmit_code("Coadmit - Somewhere Else"), None);
        assert_eq!(coadmit_code(""), None);
    }
}
