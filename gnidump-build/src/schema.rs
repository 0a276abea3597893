//! Target schema DDL.
//!
//! The build owns the schema outright: every run drops `public` and
//! recreates the tables from scratch. Text columns that hold names or ids
//! use C collation so comparisons and indexes are byte-exact.

/// Table-creation statements, in dependency-free order.
pub(crate) const CREATE_TABLES: &[&str] = &[
    r#"CREATE TABLE data_sources (
  id smallint PRIMARY KEY,
  uuid uuid NOT NULL DEFAULT '00000000-0000-0000-0000-000000000000',
  title character varying(255),
  title_short character varying(50),
  version character varying(50),
  revision_date text,
  doi character varying(50),
  citation text,
  authors text,
  description text,
  website_url character varying(255),
  data_url character varying(255),
  outlink_url text,
  is_outlink_ready boolean NOT NULL DEFAULT false,
  is_curated boolean NOT NULL DEFAULT false,
  is_auto_curated boolean NOT NULL DEFAULT false,
  has_taxon_data boolean NOT NULL DEFAULT false,
  record_count integer,
  updated_at timestamp without time zone
)"#,
    r#"CREATE TABLE name_strings (
  id uuid PRIMARY KEY,
  name character varying(500) COLLATE "C" NOT NULL,
  year smallint,
  cardinality integer,
  canonical_id uuid,
  canonical_full_id uuid,
  canonical_stem_id uuid,
  virus boolean NOT NULL DEFAULT false,
  bacteria boolean NOT NULL DEFAULT false,
  surrogate boolean NOT NULL DEFAULT false,
  parse_quality integer NOT NULL DEFAULT 0
)"#,
    r#"CREATE TABLE canonicals (
  id uuid PRIMARY KEY,
  name character varying(500) COLLATE "C" NOT NULL
)"#,
    r#"CREATE TABLE canonical_fulls (
  id uuid PRIMARY KEY,
  name character varying(500) COLLATE "C" NOT NULL
)"#,
    r#"CREATE TABLE canonical_stems (
  id uuid PRIMARY KEY,
  name character varying(500) COLLATE "C" NOT NULL
)"#,
    r#"CREATE TABLE name_string_indices (
  data_source_id integer NOT NULL,
  record_id character varying(255) COLLATE "C" NOT NULL,
  name_string_id uuid NOT NULL,
  outlink_id character varying(255),
  global_id character varying(255),
  local_id character varying(255),
  code_id smallint,
  rank character varying(255),
  accepted_record_id character varying(255) COLLATE "C",
  classification text COLLATE "C",
  classification_ids text COLLATE "C",
  classification_ranks text,
  PRIMARY KEY (data_source_id, record_id, name_string_id)
)"#,
    r#"CREATE TABLE vernacular_strings (
  id uuid PRIMARY KEY,
  name character varying(500) COLLATE "C" NOT NULL
)"#,
    r#"CREATE TABLE vernacular_string_indices (
  data_source_id integer NOT NULL,
  record_id character varying(255) COLLATE "C" NOT NULL,
  vernacular_string_id uuid NOT NULL,
  language character varying(100),
  language_orig character varying(100),
  lang_code character varying(3),
  locality character varying(255),
  country_code character varying(50),
  PRIMARY KEY (data_source_id, record_id, vernacular_string_id)
)"#,
    r#"CREATE TABLE words (
  id uuid NOT NULL,
  normalized character varying(255) COLLATE "C" NOT NULL,
  modified character varying(255) COLLATE "C" NOT NULL,
  type_id integer,
  PRIMARY KEY (id, normalized)
)"#,
    r#"CREATE TABLE word_name_strings (
  word_id uuid NOT NULL,
  name_string_id uuid NOT NULL,
  canonical_id uuid NOT NULL,
  PRIMARY KEY (word_id, name_string_id)
)"#,
];

/// Secondary indexes, created right after the tables.
pub(crate) const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX index_name_strings_on_canonical_id ON name_strings (canonical_id)",
    "CREATE INDEX index_name_strings_on_canonical_full_id ON name_strings (canonical_full_id)",
    "CREATE INDEX index_name_strings_on_canonical_stem_id ON name_strings (canonical_stem_id)",
    "CREATE INDEX index_canonicals_on_name ON canonicals (name)",
    "CREATE INDEX index_nsi_on_name_string_id ON name_string_indices (name_string_id)",
    "CREATE INDEX index_nsi_on_accepted_record_id ON name_string_indices (accepted_record_id)",
    "CREATE INDEX index_vsi_on_vernacular_string_id ON vernacular_string_indices (vernacular_string_id)",
    "CREATE INDEX index_vsi_on_lang_code ON vernacular_string_indices (lang_code)",
    "CREATE INDEX index_words_on_modified ON words (modified)",
];
