pub const SCHEMA: &str = r#"
-- Projects: a named set of source files plus ownership metadata
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),

    -- JSON object: path -> {"code": text}
    files TEXT NOT NULL DEFAULT '{}',

    -- NULL = anonymous, not owned by anyone
    owner_id TEXT,
    is_public INTEGER NOT NULL DEFAULT 0,

    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_projects_owner_updated ON projects(owner_id, updated_at DESC);
CREATE INDEX IF NOT EXISTS idx_projects_public_updated ON projects(is_public, updated_at DESC);
"#;
