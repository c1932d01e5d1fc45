// Built-in American -> British spelling table.
//
// Regular families are generated from stems; irregular words are listed
// explicitly. No British form may appear as an American key, so converting
// already-British text is a no-op.

/// Stems taking -ize/-ise and the usual inflections
const IZE_STEMS: &[&str] = &[
    "agon", "antagon", "apolog", "author", "bapt", "capital", "categor", "central",
    "character", "civil", "colon", "critic", "custom", "democrat", "dramat", "econom",
    "emphas", "equal", "familiar", "fertil", "final", "general", "global", "harmon",
    "hospital", "hypnot", "ideal", "immun", "initial", "item", "jeopard", "legal",
    "local", "magnet", "marginal", "maxim", "memor", "mesmer", "minim", "mobil",
    "modern", "monopol", "neutral", "normal", "optim", "organ", "oxid", "pasteur",
    "patron", "penal", "personal", "plagiar", "polar", "popular", "pressur", "priorit",
    "public", "random", "rational", "real", "recogn", "revolution", "sanit", "satir",
    "scandal", "scrutin", "sensit", "serial", "social", "special", "stabil", "standard",
    "stigmat", "subsid", "summar", "symbol", "sympath", "synchron", "synthes", "tantal",
    "tender", "terror", "theor", "token", "tranquil", "union", "util", "vandal",
    "vapor", "visual", "vocal",
];

const IZE_SUFFIXES: &[(&str, &str)] = &[
    ("ize", "ise"),
    ("izes", "ises"),
    ("ized", "ised"),
    ("izing", "ising"),
    ("ization", "isation"),
    ("izations", "isations"),
];

/// -izer nouns that are common enough to list
const IZER_STEMS: &[&str] = &[
    "equal", "fertil", "initial", "normal", "optim", "organ", "sanit", "serial",
    "stabil", "synthes", "token", "visual",
];

const YZE_STEMS: &[&str] = &["anal", "catal", "dial", "electrol", "hydrol", "paral"];

const YZE_SUFFIXES: &[(&str, &str)] = &[
    ("yze", "yse"),
    ("yzes", "yses"),
    ("yzed", "ysed"),
    ("yzing", "ysing"),
    ("yzer", "yser"),
    ("yzers", "ysers"),
];

/// -or/-our words that inflect as verbs
const OR_VERB_STEMS: &[&str] = &[
    "arm", "clam", "col", "endeav", "flav", "fav", "harb", "hon", "hum", "lab", "rum", "sav",
];

const OR_VERB_SUFFIXES: &[(&str, &str)] = &[
    ("or", "our"),
    ("ors", "ours"),
    ("ored", "oured"),
    ("oring", "ouring"),
];

/// -or/-our words that only take a plural
const OR_NOUN_STEMS: &[&str] = &[
    "ard", "behavi", "cand", "demean", "ferv", "glam", "neighb", "od", "parl", "rig",
    "splend", "tum", "val", "vap", "vig",
];

/// -er/-re nouns with a plural
const RE_STEMS: &[&str] = &[
    "calib", "cent", "centimet", "decimet", "fib", "goit", "kilomet", "lit", "lust",
    "millimet", "mit", "sab", "scept", "sepulch", "somb", "spect", "theat",
];

/// Verbs whose final l doubles in British past tense and participle
const L_STEMS: &[&str] = &[
    "cancel", "channel", "counsel", "dial", "duel", "equal", "fuel", "grovel", "label",
    "level", "marvel", "model", "panel", "pedal", "quarrel", "rival", "shovel", "signal",
    "snorkel", "swivel", "total", "travel", "tunnel", "unravel", "yodel",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("acknowledgment", "acknowledgement"),
    ("acknowledgments", "acknowledgements"),
    ("aging", "ageing"),
    ("airplane", "aeroplane"),
    ("airplanes", "aeroplanes"),
    ("aluminum", "aluminium"),
    ("analog", "analogue"),
    ("analogs", "analogues"),
    ("anemia", "anaemia"),
    ("anemic", "anaemic"),
    ("anesthesia", "anaesthesia"),
    ("anesthetic", "anaesthetic"),
    ("archeology", "archaeology"),
    ("archeologist", "archaeologist"),
    ("artifact", "artefact"),
    ("artifacts", "artefacts"),
    ("behavioral", "behavioural"),
    ("carburetor", "carburettor"),
    ("catalog", "catalogue"),
    ("catalogs", "catalogues"),
    ("cataloged", "catalogued"),
    ("cataloging", "cataloguing"),
    ("centered", "centred"),
    ("centering", "centring"),
    ("colorful", "colourful"),
    ("colorless", "colourless"),
    ("counselor", "counsellor"),
    ("counselors", "counsellors"),
    ("cozy", "cosy"),
    ("defense", "defence"),
    ("defenses", "defences"),
    ("defenseless", "defenceless"),
    ("diarrhea", "diarrhoea"),
    ("donut", "doughnut"),
    ("donuts", "doughnuts"),
    ("enroll", "enrol"),
    ("enrolls", "enrols"),
    ("enrollment", "enrolment"),
    ("enrollments", "enrolments"),
    ("epilog", "epilogue"),
    ("esophagus", "oesophagus"),
    ("esthetic", "aesthetic"),
    ("estrogen", "oestrogen"),
    ("favorable", "favourable"),
    ("favorably", "favourably"),
    ("favorite", "favourite"),
    ("favorites", "favourites"),
    ("fetus", "foetus"),
    ("flavorful", "flavourful"),
    ("fulfill", "fulfil"),
    ("fulfills", "fulfils"),
    ("fulfillment", "fulfilment"),
    ("gray", "grey"),
    ("grays", "greys"),
    ("grayish", "greyish"),
    ("gynecology", "gynaecology"),
    ("honorable", "honourable"),
    ("humorless", "humourless"),
    ("installment", "instalment"),
    ("installments", "instalments"),
    ("instill", "instil"),
    ("instills", "instils"),
    ("jeweler", "jeweller"),
    ("jewelers", "jewellers"),
    ("jewelry", "jewellery"),
    ("judgment", "judgement"),
    ("judgments", "judgements"),
    ("leukemia", "leukaemia"),
    ("maneuver", "manoeuvre"),
    ("maneuvers", "manoeuvres"),
    ("maneuvered", "manoeuvred"),
    ("maneuvering", "manoeuvring"),
    ("marvelous", "marvellous"),
    ("meager", "meagre"),
    ("modeler", "modeller"),
    ("mold", "mould"),
    ("molds", "moulds"),
    ("molded", "moulded"),
    ("molding", "moulding"),
    ("moldy", "mouldy"),
    ("mollusk", "mollusc"),
    ("molt", "moult"),
    ("monolog", "monologue"),
    ("mustache", "moustache"),
    ("neighborhood", "neighbourhood"),
    ("neighborhoods", "neighbourhoods"),
    ("neighboring", "neighbouring"),
    ("offense", "offence"),
    ("offenses", "offences"),
    ("omelet", "omelette"),
    ("orthopedic", "orthopaedic"),
    ("pajamas", "pyjamas"),
    ("pediatric", "paediatric"),
    ("pediatrician", "paediatrician"),
    ("plow", "plough"),
    ("plows", "ploughs"),
    ("plowed", "ploughed"),
    ("plowing", "ploughing"),
    ("practiced", "practised"),
    ("practicing", "practising"),
    ("pretense", "pretence"),
    ("skeptic", "sceptic"),
    ("skeptical", "sceptical"),
    ("skepticism", "scepticism"),
    ("skillful", "skilful"),
    ("skillfully", "skilfully"),
    ("sulfate", "sulphate"),
    ("sulfur", "sulphur"),
    ("tidbit", "titbit"),
    ("travelers", "travellers"),
    ("traveler", "traveller"),
    ("willful", "wilful"),
    ("woolen", "woollen"),
    ("yogurt", "yoghurt"),
];

/// Every built-in pair, generated families first, irregular words last
pub fn pairs() -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for stem in IZE_STEMS {
        for (us, gb) in IZE_SUFFIXES {
            pairs.push((format!("{stem}{us}"), format!("{stem}{gb}")));
        }
    }
    for stem in IZER_STEMS {
        pairs.push((format!("{stem}izer"), format!("{stem}iser")));
        pairs.push((format!("{stem}izers"), format!("{stem}isers")));
    }
    for stem in YZE_STEMS {
        for (us, gb) in YZE_SUFFIXES {
            pairs.push((format!("{stem}{us}"), format!("{stem}{gb}")));
        }
    }
    for stem in OR_VERB_STEMS {
        for (us, gb) in OR_VERB_SUFFIXES {
            pairs.push((format!("{stem}{us}"), format!("{stem}{gb}")));
        }
    }
    for stem in OR_NOUN_STEMS {
        pairs.push((format!("{stem}or"), format!("{stem}our")));
        pairs.push((format!("{stem}ors"), format!("{stem}ours")));
    }
    for stem in RE_STEMS {
        pairs.push((format!("{stem}er"), format!("{stem}re")));
        pairs.push((format!("{stem}ers"), format!("{stem}res")));
    }
    for stem in L_STEMS {
        pairs.push((format!("{stem}ed"), format!("{stem}led")));
        pairs.push((format!("{stem}ing"), format!("{stem}ling")));
    }

    pairs.extend(
        IRREGULAR
            .iter()
            .map(|(us, gb)| (us.to_string(), gb.to_string())),
    );

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_families() {
        let pairs = pairs();
        let has = |us: &str, gb: &str| pairs.iter().any(|(a, b)| a == us && b == gb);

        assert!(has("organize", "organise"));
        assert!(has("organizations", "organisations"));
        assert!(has("analyzing", "analysing"));
        assert!(has("colored", "coloured"));
        assert!(has("neighbors", "neighbours"));
        assert!(has("center", "centre"));
        assert!(has("kilometers", "kilometres"));
        assert!(has("traveled", "travelled"));
        assert!(has("modeling", "modelling"));
    }

    #[test]
    fn test_british_forms_are_never_keys() {
        let pairs = pairs();
        let keys: HashSet<&str> = pairs.iter().map(|(us, _)| us.as_str()).collect();
        for (_, gb) in &pairs {
            assert!(!keys.contains(gb.as_str()), "{gb} is also a key");
        }
    }
}
