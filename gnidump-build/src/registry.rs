//! Static data-source registry.
//!
//! Curated metadata keyed by the historic numeric source id: titles, uuids,
//! URLs, and the per-source rule for building outlink ids. The registry is
//! build-time code, never persisted; the CSV dump supplies the rest of each
//! row.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters kept verbatim by both escapes (RFC 3986 unreserved).
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Name fields an outlink id can be derived from.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameInf {
    pub record_id: String,
    pub accepted_record_id: String,
    pub local_id: String,
    #[allow(dead_code)]
    pub global_id: String,
    pub canonical: String,
    pub canonical_full: String,
}

/// Per-source outlink-id strategy; one variant per rule in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutlinkId {
    /// The source's local id as-is.
    LocalId,
    /// The source's record id as-is.
    RecordId,
    /// The accepted record id as-is.
    AcceptedRecordId,
    /// Full canonical with spaces turned into underscores (wiki links).
    CanonicalFullUnderscored,
    /// Simple canonical, path-escaped.
    CanonicalPathEscaped,
    /// Simple canonical, query-escaped (space becomes `+`).
    CanonicalQueryEscaped,
}

impl OutlinkId {
    pub fn apply(&self, n: &NameInf) -> String {
        match self {
            OutlinkId::LocalId => n.local_id.clone(),
            OutlinkId::RecordId => n.record_id.clone(),
            OutlinkId::AcceptedRecordId => n.accepted_record_id.clone(),
            OutlinkId::CanonicalFullUnderscored => n.canonical_full.replace(' ', "_"),
            OutlinkId::CanonicalPathEscaped => path_escape(&n.canonical),
            OutlinkId::CanonicalQueryEscaped => query_escape(&n.canonical),
        }
    }
}

fn path_escape(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

fn query_escape(s: &str) -> String {
    // Form encoding: spaces become '+', the rest percent-escapes.
    utf8_percent_encode(s, UNRESERVED)
        .to_string()
        .replace("%20", "+")
}

/// Registry entry; fields left empty are taken from the CSV dump.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceInfo {
    pub title: &'static str,
    pub title_short: &'static str,
    pub description: &'static str,
    pub uuid: &'static str,
    pub home_url: &'static str,
    pub data_url: &'static str,
    pub outlink_url: &'static str,
    pub is_outlink_ready: bool,
    pub outlink_id: Option<OutlinkId>,
}

/// Looks up the registry entry for a source id.
pub(crate) fn source_info(id: i32) -> Option<&'static SourceInfo> {
    REGISTRY.iter().find(|(rid, _)| *rid == id).map(|(_, s)| s)
}

static REGISTRY: &[(i32, SourceInfo)] = &[
    (
        1,
        SourceInfo {
            title: "Catalogue of Life",
            title_short: "Catalogue of Life",
            uuid: "d4df2968-4257-4ad9-ab81-bedbbfb25e2a",
            home_url: "https://www.catalogueoflife.org/",
            data_url: "http://www.catalogueoflife.org/DCA_Export/archive.php",
            is_outlink_ready: true,
            outlink_url: "http://www.catalogueoflife.org/annual-checklist/2019/details/species/id/{}",
            outlink_id: Some(OutlinkId::LocalId),
            description: "",
        },
    ),
    (
        2,
        SourceInfo {
            title: "",
            title_short: "Wikispecies",
            uuid: "68923690-0727-473c-b7c5-2ae9e601e3fd",
            home_url: "https://species.wikimedia.org/wiki/Main_Page",
            data_url: "http://dumps.wikimedia.org/specieswiki/latest/specieswiki-latest-pages-articles.xml.bz2",
            is_outlink_ready: true,
            outlink_url: "http://species.wikimedia.org/wiki/{}",
            outlink_id: Some(OutlinkId::CanonicalFullUnderscored),
            description: "",
        },
    ),
    (
        3,
        SourceInfo {
            title: "Integrated Taxonomic Information System",
            title_short: "ITIS",
            uuid: "5d066e84-e512-4a2f-875c-0a605d3d9f35",
            home_url: "https://www.itis.gov/",
            data_url: "https://www.itis.gov/downloads/itisMySQLTables.tar.gz",
            is_outlink_ready: true,
            outlink_url: "https://www.itis.gov/servlet/SingleRpt/SingleRpt?search_topic=TSN&search_value={}#null",
            outlink_id: Some(OutlinkId::RecordId),
            description: "",
        },
    ),
    (
        4,
        SourceInfo {
            title: "National Center for Biotechnology Information",
            title_short: "NCBI",
            uuid: "97d7633b-5f79-4307-a397-3c29402d9311",
            home_url: "https://www.ncbi.nlm.nih.gov/",
            data_url: "ftp://ftp.ncbi.nih.gov/pub/taxonomy/taxdump.tar.gz",
            is_outlink_ready: true,
            outlink_url: "https://www.ncbi.nlm.nih.gov/Taxonomy/Browser/wwwtax.cgi?mode=Undef&name={}&lvl=0&srchmode=1&keep=1&unlock",
            outlink_id: Some(OutlinkId::CanonicalPathEscaped),
            description: "",
        },
    ),
    (
        5,
        SourceInfo {
            title: "Index Fungorum: Species Fungorum",
            title_short: "Index Fungorum",
            uuid: "af06816a-0b28-4a09-8219-bd1d63289858",
            home_url: "http://www.speciesfungorum.org",
            is_outlink_ready: true,
            outlink_url: "http://www.indexfungorum.org/Names/NamesRecord.asp?RecordID={}",
            outlink_id: Some(OutlinkId::RecordId),
            data_url: "",
            description: "",
        },
    ),
    (
        8,
        SourceInfo {
            title: "",
            title_short: "IRMNG (old)",
            uuid: "f8e586aa-876e-4b0a-ab89-da0b4a64c19a",
            home_url: "https://irmng.org/",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        9,
        SourceInfo {
            title: "",
            title_short: "WoRMS",
            uuid: "bf077d91-673a-4be4-8af9-76db45d07e98",
            home_url: "https://marinespecies.org",
            is_outlink_ready: true,
            data_url: "",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        10,
        SourceInfo {
            title: "",
            title_short: "Freebase",
            uuid: "bacd21f0-44e0-43e2-914c-70929916f257",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        11,
        SourceInfo {
            title: "Global Biodiversity Information Facility Backbone Taxonomy",
            title_short: "GBIF Backbone Taxonomy",
            uuid: "eebb6f49-e1a1-4f42-b9d5-050844c893cd",
            is_outlink_ready: true,
            home_url: "https://www.gbif.org/dataset/d7dddbf4-2cf0-4f39-9b2a-bb099caae36c",
            data_url: "",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        12,
        SourceInfo {
            title: "",
            title_short: "EOL",
            uuid: "dba5f880-a40d-479b-a1ad-a646835edde4",
            home_url: "https://eol.org",
            data_url: "https://eol.org/data/provider_ids.csv.gz",
            is_outlink_ready: true,
            outlink_url: "https://eol.org/pages/{}",
            outlink_id: Some(OutlinkId::RecordId),
            description: "",
        },
    ),
    (
        113,
        SourceInfo {
            title: "Zoological names",
            title_short: "Zoological names",
            uuid: "",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        117,
        SourceInfo {
            title: "Birds of Tansania",
            title_short: "Birds of Tansania",
            uuid: "",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        119,
        SourceInfo {
            title: "Tansania Plant Specimens",
            title_short: "Tansania Plant Specimens",
            uuid: "",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        142,
        SourceInfo {
            title: "The Clements Checklist of Birds of the World",
            title_short: "The Clements Checklist of Birds",
            uuid: "",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        147,
        SourceInfo {
            title: "",
            title_short: "VASCAN",
            uuid: "",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        149,
        SourceInfo {
            title: "Ocean Biodiversity Information System",
            title_short: "",
            uuid: "",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "",
        },
    ),
    (
        155,
        SourceInfo {
            title: "",
            title_short: "FishBase",
            uuid: "bacd21f0-44e0-43e2-914c-70929916f257",
            is_outlink_ready: true,
            home_url: "https://www.fishbase.in/home.htm",
            data_url: "",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        165,
        SourceInfo {
            title: "",
            title_short: "",
            uuid: "",
            home_url: "",
            data_url: "",
            outlink_url: "",
            is_outlink_ready: false,
            outlink_id: None,
            description: "The Tropicos database links over 1.33M scientific names with over 4.87M specimens and over 685K digital images. The data includes over 150K references from over 52.6K publications offered as a free service to the world's scientific community.",
        },
    ),
    (
        167,
        SourceInfo {
            title: "",
            title_short: "IPNI",
            uuid: "6b3905ce-5025-49f3-9697-ddd5bdfb4ff0",
            home_url: "https://www.ipni.org/",
            is_outlink_ready: true,
            outlink_url: "https://www.ipni.org/n/{}",
            outlink_id: Some(OutlinkId::RecordId),
            data_url: "",
            description: "",
        },
    ),
    (
        168,
        SourceInfo {
            title: "",
            title_short: "ION",
            uuid: "1137dfa3-5b8c-487d-b497-dc0938605864",
            home_url: "http://organismnames.com/",
            is_outlink_ready: true,
            outlink_url: "http://www.organismnames.com/details.htm?lsid={}",
            outlink_id: Some(OutlinkId::RecordId),
            data_url: "",
            description: "",
        },
    ),
    (
        170,
        SourceInfo {
            title: "",
            title_short: "Arctos",
            uuid: "eea8315d-a244-4625-859a-226675622312",
            home_url: "https://arctosdb.org/",
            is_outlink_ready: true,
            outlink_url: "https://arctos.database.museum/name/{}",
            outlink_id: Some(OutlinkId::CanonicalQueryEscaped),
            data_url: "",
            description: "",
        },
    ),
    (
        172,
        SourceInfo {
            title: "",
            title_short: "PaleoBioDB",
            uuid: "fad9970e-c358-4e1b-8cc3-f9ad2582751f",
            home_url: "https://paleobiodb.org/#/",
            is_outlink_ready: true,
            data_url: "",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        173,
        SourceInfo {
            title: "",
            title_short: "The Reptile DataBase",
            uuid: "c24e0905-4980-4e1d-aff2-ee0ef54ea1f8",
            home_url: "http://reptile-database.org/",
            is_outlink_ready: true,
            data_url: "",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        174,
        SourceInfo {
            title: "",
            title_short: "Mammal Species of the World",
            uuid: "464dafec-1037-432d-8449-c0b309e0a030",
            home_url: "https://www.departments.bucknell.edu/biology/resources/msw3/",
            data_url: "https://www.departments.bucknell.edu/biology/resources/msw3/export.asp",
            is_outlink_ready: true,
            outlink_url: "https://www.departments.bucknell.edu/biology/resources/msw3/browse.asp?s=y&id={}",
            outlink_id: Some(OutlinkId::LocalId),
            description: "",
        },
    ),
    (
        175,
        SourceInfo {
            title: "",
            title_short: "BirdLife International",
            uuid: "b1d8de7a-ab96-455f-acd8-f3fff2d7d169",
            home_url: "http://www.birdlife.org/",
            data_url: "http://datazone.birdlife.org/species/taxonomy",
            is_outlink_ready: true,
            outlink_url: "http://datazone.birdlife.org/species/results?thrlev1=&thrlev2=&kw={}",
            outlink_id: Some(OutlinkId::CanonicalPathEscaped),
            description: "",
        },
    ),
    (
        179,
        SourceInfo {
            title: "",
            title_short: "Open Tree of Life",
            uuid: "e10865e2-cdd9-4f97-912f-08f3d5ef49f7",
            is_outlink_ready: true,
            home_url: "https://tree.opentreeoflife.org/",
            data_url: "https://files.opentreeoflife.org/ott/",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        181,
        SourceInfo {
            title: "",
            title_short: "IRMNG",
            uuid: "417454fa-a0a1-4b9c-814d-edc0f4f25ad8",
            is_outlink_ready: true,
            home_url: "https://irmng.org/",
            data_url: "https://irmng.org/export/",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        183,
        SourceInfo {
            title: "",
            title_short: "Sherborn Index Animalium",
            uuid: "05ad6ca2-fc37-47f4-983a-72e535420e28",
            is_outlink_ready: true,
            home_url: "https://www.sil.si.edu/DigitalCollections/indexanimalium/taxonomicnames/",
            data_url: "https://www.sil.si.edu/DigitalCollections/indexanimalium/Datasets/2006.01.06.TaxonomicData.csv",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        184,
        SourceInfo {
            title: "",
            title_short: "ASM Mammal Diversity DB",
            uuid: "94270cdd-5424-4bb1-8324-46ccc5386dc7",
            home_url: "https://mammaldiversity.org/",
            data_url: "https://mammaldiversity.org/",
            is_outlink_ready: true,
            outlink_url: "https://mammaldiversity.org/species-account/species-id={}",
            outlink_id: Some(OutlinkId::AcceptedRecordId),
            description: "",
        },
    ),
    (
        185,
        SourceInfo {
            title: "",
            title_short: "IOC World Bird List",
            uuid: "6421ffec-38e3-40fb-a6d9-af27238a47a1",
            is_outlink_ready: true,
            home_url: "https://www.worldbirdnames.org/",
            data_url: "https://www.worldbirdnames.org/ioc-lists/master-list-2/",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        186,
        SourceInfo {
            title: "",
            title_short: "MCZbase",
            uuid: "c79d055b-211b-40de-8e27-618011656265",
            is_outlink_ready: true,
            home_url: "https://mczbase.mcz.harvard.edu/",
            outlink_url: "https://mczbase.mcz.harvard.edu/name/{}",
            outlink_id: Some(OutlinkId::CanonicalPathEscaped),
            data_url: "",
            description: "",
        },
    ),
    (
        187,
        SourceInfo {
            title: "",
            title_short: "Clements' Birds of the World",
            uuid: "577c0b56-4a3c-4314-8724-14b304f601de",
            is_outlink_ready: true,
            home_url: "https://www.birds.cornell.edu/clementschecklist/",
            data_url: "https://www.birds.cornell.edu/clementschecklist/download/",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        188,
        SourceInfo {
            title: "",
            title_short: "American Ornithological Society",
            uuid: "91d38806-8435-479f-a18d-705e5cb0767c",
            home_url: "https://americanornithology.org/",
            is_outlink_ready: true,
            data_url: "https://checklist.americanornithology.org/taxa.csv",
            outlink_url: "https://checklist.americanornithology.org/taxa/{}",
            outlink_id: Some(OutlinkId::RecordId),
            description: "",
        },
    ),
    (
        189,
        SourceInfo {
            title: "",
            title_short: "Howard & Moore Birds of the World",
            uuid: "85023fe5-bf2a-486b-bdae-3e61cefd41fd",
            home_url: "https://www.howardandmoore.org/",
            is_outlink_ready: true,
            data_url: "https://www.howardandmoore.org/howard-and-moore-database/",
            outlink_url: "",
            outlink_id: None,
            description: "",
        },
    ),
    (
        194,
        SourceInfo {
            title: "",
            title_short: "Plazi",
            uuid: "68938dc9-b93d-43bc-9d51-5c2a632f136f",
            home_url: "https://www.plazi.org/",
            is_outlink_ready: true,
            data_url: "http://tb.plazi.org/GgServer/xml.rss.xml",
            outlink_url: "http://tb.plazi.org/GgServer/html/{}",
            outlink_id: Some(OutlinkId::LocalId),
            description: "",
        },
    ),
    (
        195,
        SourceInfo {
            title: "",
            title_short: "AlgaeBase",
            uuid: "a5869bfb-7cbf-40f2-88d3-962922dac43f",
            home_url: "https://www.algaebase.org/",
            is_outlink_ready: true,
            outlink_url: "https://www.algaebase.org/search/species/detail/?species_id={}",
            outlink_id: Some(OutlinkId::RecordId),
            data_url: "",
            description: "",
        },
    ),
];
