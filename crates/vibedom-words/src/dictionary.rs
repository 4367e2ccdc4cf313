/// Bundled adjective list used by `generate_session_id`. Lowercase, no
/// hyphens (hyphenation is reserved for joining workspace/adjective/noun).
pub const ADJECTIVES: &[&str] = &[
    "able", "agile", "amber", "ancient", "arid", "autumn", "bashful", "bold", "brave", "brief",
    "bright", "brisk", "broad", "calm", "candid", "cheerful", "chilly", "clear", "clever",
    "cloudy", "cosmic", "coy", "crimson", "crisp", "cryptic", "curious", "daring", "dawn",
    "deep", "dim", "distant", "dusty", "eager", "early", "earnest", "easy", "elegant", "faint",
    "faded", "fleet", "fond", "fresh", "frosty", "gentle", "giant", "golden", "grave", "gray",
    "green", "happy", "hasty", "hazy", "hidden", "honest", "humble", "icy", "idle", "jolly",
    "keen", "kind", "lazy", "light", "little", "lively", "lonely", "loud", "loyal", "lucid",
    "lunar", "mellow", "merry", "mighty", "misty", "modest", "muted", "near", "neat", "nimble",
    "noble", "odd", "opal", "pale", "patient", "plain", "plump", "polite", "precise", "proud",
    "quick", "quiet", "rapid", "rare", "rosy", "round", "rustic", "sage", "salty", "sandy",
    "serene", "sharp", "shy", "silent", "silver", "sleek", "sleepy", "small", "smooth", "soft",
    "solar", "solid", "sparse", "spry", "steady", "stern", "stony", "subtle", "sunny", "swift",
    "tame", "tart", "tender", "terse", "thin", "tidy", "tiny", "tired", "tough", "tranquil",
    "true", "vague", "vast", "velvet", "vivid", "warm", "weary", "wild", "wise", "zesty",
];

/// Bundled noun list used by `generate_session_id`. Lowercase, no hyphens.
pub const NOUNS: &[&str] = &[
    "otter", "falcon", "badger", "heron", "lynx", "marten", "osprey", "raven", "sparrow",
    "tapir", "weasel", "wombat", "beacon", "bridge", "canyon", "cedar", "cinder", "comet",
    "copper", "coral", "cove", "crag", "creek", "delta", "dune", "ember", "fern", "fjord",
    "foothill", "forest", "garnet", "geyser", "glacier", "glade", "granite", "grove", "harbor",
    "hollow", "island", "jasper", "lagoon", "lantern", "ledge", "meadow", "mesa", "mirror",
    "moss", "orchard", "pebble", "pine", "plateau", "prairie", "quarry", "reef", "ridge",
    "river", "shale", "shoal", "slate", "spring", "spruce", "summit", "thicket", "tide",
    "timber", "trail", "tundra", "valley", "vapor", "willow", "wren", "zephyr", "alcove",
    "basin", "birch", "boulder", "brook", "cascade", "cliff", "current", "dell", "eddy",
    "cairn", "fjell", "glen", "grotto", "hearth", "inlet", "juniper", "knoll", "lichen",
    "marsh", "nook", "oasis", "paddock", "quill", "ravine", "sedge", "shore", "steppe",
    "thistle", "vale", "wharf", "xylem", "yew", "zenith",
];
