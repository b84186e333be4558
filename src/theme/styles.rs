//! Global CSS for peerscope.
//!
//! Dark terminal palette. Class names match the `peerscope-ui` components.

pub const GLOBAL_STYLES: &str = r#"
/* === CSS Custom Properties === */
:root {
  --void-black: #0a0a0a;
  --void-lighter: #0f1314;
  --void-border: #1f2526;

  --moss: #5a7a5a;
  --moss-glow: #7cb87c;

  --cyan: #00d4aa;
  --cyan-glow: rgba(0, 212, 170, 0.3);

  --gold: #d4af37;

  --text-primary: #f5f5f5;
  --text-secondary: rgba(245, 245, 245, 0.7);
  --text-muted: rgba(245, 245, 245, 0.5);

  --danger: #ff3366;
  --warning: #ff9f00;
  --info: #5f8fff;

  --font-mono: 'JetBrains Mono', 'SF Mono', 'Consolas', monospace;
  --text-xs: 0.75rem;
  --text-sm: 0.875rem;
  --text-base: 1rem;
  --text-xl: 1.5rem;

  --transition-fast: 150ms ease;
}

*, *::before, *::after {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-mono);
  font-size: var(--text-sm);
  background: var(--void-black);
  color: var(--text-primary);
  line-height: 1.6;
  min-height: 100vh;
}

/* === Layout === */
.app-shell {
  display: flex;
  flex-direction: column;
  min-height: 100vh;
}

.app-content {
  flex: 1;
  padding: 1.5rem;
}

.nav-header {
  display: flex;
  align-items: center;
  gap: 1.5rem;
  padding: 0.75rem 1.5rem;
  border-bottom: 1px solid var(--void-border);
  background: var(--void-lighter);
}

.nav-brand {
  color: var(--gold);
  font-weight: 600;
  letter-spacing: 0.08em;
}

.nav-links {
  display: flex;
  flex-wrap: wrap;
  gap: 0.75rem;
}

.nav-link {
  color: var(--text-secondary);
  text-decoration: none;
  transition: color var(--transition-fast);
}

.nav-link:hover,
.nav-link.active {
  color: var(--cyan);
}

.page-title {
  font-size: var(--text-xl);
  font-weight: 400;
  color: var(--gold);
  margin-bottom: 0.5rem;
}

.page-hint,
.hint {
  color: var(--text-muted);
  font-size: var(--text-xs);
  margin-bottom: 1rem;
}

.section-title {
  display: flex;
  align-items: baseline;
  gap: 0.5rem;
  color: var(--text-secondary);
  font-weight: 400;
  margin: 1rem 0 0.5rem;
}

.empty-state {
  color: var(--text-muted);
  padding: 1rem 0;
}

/* === Buttons === */
.btn {
  display: inline-flex;
  align-items: center;
  gap: 0.4rem;
  font-family: var(--font-mono);
  font-size: var(--text-sm);
  padding: 0.4rem 0.9rem;
  border-radius: 4px;
  background: transparent;
  cursor: pointer;
  text-decoration: none;
  transition: box-shadow var(--transition-fast), border-color var(--transition-fast);
}

.btn:disabled {
  opacity: 0.5;
  cursor: not-allowed;
}

.btn-primary {
  border: 1px solid var(--moss);
  color: var(--moss-glow);
}

.btn-primary:hover:not(:disabled) {
  box-shadow: 0 0 12px var(--cyan-glow);
}

.btn-ghost {
  border: 1px solid var(--void-border);
  color: var(--text-secondary);
}

.btn-danger {
  border: 1px solid var(--danger);
  color: var(--danger);
}

.btn-chip {
  padding: 0.1rem 0.6rem;
  font-size: var(--text-xs);
  border: 1px solid var(--void-border);
  color: var(--text-muted);
}

.btn-chip.on {
  border-color: var(--cyan);
  color: var(--cyan);
}

.spinner {
  width: 0.8rem;
  height: 0.8rem;
  border: 2px solid var(--void-border);
  border-top-color: var(--cyan);
  border-radius: 50%;
  animation: spin 0.8s linear infinite;
}

@keyframes spin {
  to { transform: rotate(360deg); }
}

.loading {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  color: var(--text-muted);
  padding: 1rem 0;
}

/* === Notices === */
.notice {
  padding: 0.5rem 0.75rem;
  margin: 0.5rem 0;
  border-left: 3px solid;
  background: var(--void-lighter);
}

.notice-error { border-color: var(--danger); color: var(--danger); }
.notice-warning { border-color: var(--warning); color: var(--warning); }
.notice-info { border-color: var(--info); color: var(--text-secondary); }

.instance-failed {
  display: flex;
  align-items: center;
  gap: 1rem;
  padding: 0 1.5rem;
}

/* === Status === */
.status-dot {
  display: inline-block;
  width: 0.5rem;
  height: 0.5rem;
  border-radius: 50%;
  background: var(--text-muted);
}

.status-dot.active {
  background: var(--moss-glow);
  box-shadow: 0 0 6px var(--moss-glow);
}

/* === Peers === */
.peer-card {
  border: 1px solid var(--void-border);
  border-radius: 4px;
  padding: 0.75rem;
  margin-bottom: 0.5rem;
}

.peer-card.local {
  border-color: var(--moss);
}

.peer-card-header {
  display: flex;
  align-items: center;
  gap: 0.5rem;
}

.peer-name {
  color: var(--text-primary);
  font-weight: 600;
}

.peer-badge,
.peer-count-badge {
  font-size: var(--text-xs);
  color: var(--text-muted);
}

.peer-badge.cloud {
  color: var(--info);
}

.peer-meta {
  display: flex;
  gap: 1rem;
  color: var(--text-secondary);
  font-size: var(--text-xs);
}

.peer-id {
  color: var(--cyan);
}

.peer-connections ul {
  list-style: none;
  margin-top: 0.25rem;
}

.peer-connection,
.peer-connection-total {
  font-size: var(--text-xs);
  color: var(--text-muted);
}

/* === Query === */
.query-input {
  width: 100%;
  min-height: 8rem;
  padding: 0.75rem;
  font-family: var(--font-mono);
  background: var(--void-lighter);
  color: var(--cyan);
  border: 1px solid var(--void-border);
  border-radius: 4px;
  resize: vertical;
}

.query-input:focus {
  outline: none;
  box-shadow: 0 0 8px var(--cyan-glow);
}

.query-actions,
.transport-presets,
.overview-links,
.settings-toolbar {
  display: flex;
  gap: 0.5rem;
  margin: 0.75rem 0;
}

.query-document {
  background: var(--void-lighter);
  border: 1px solid var(--void-border);
  padding: 0.5rem;
  margin-bottom: 0.5rem;
  overflow-x: auto;
  font-size: var(--text-xs);
}

.query-mutated-ids {
  list-style: none;
  color: var(--cyan);
}

/* === Settings === */
.input {
  flex: 1;
  padding: 0.4rem 0.6rem;
  font-family: var(--font-mono);
  background: transparent;
  color: var(--cyan);
  border: 1px solid var(--void-border);
  border-radius: 4px;
}

.settings-meta {
  color: var(--text-muted);
  font-size: var(--text-xs);
}

.settings-table {
  width: 100%;
  border-collapse: collapse;
}

.settings-table td {
  padding: 0.3rem 0.5rem;
  border-bottom: 1px solid var(--void-border);
}

.setting-key { color: var(--text-secondary); }
.setting-value { color: var(--text-primary); }
.setting-value.number { color: var(--gold); }
.setting-value.bool-true { color: var(--moss-glow); }
.setting-value.bool-false { color: var(--danger); }

/* === Disk usage === */
.disk-usage-header {
  display: flex;
  justify-content: space-between;
  align-items: baseline;
}

.disk-usage-items {
  list-style: none;
}

.disk-usage-item {
  display: grid;
  grid-template-columns: 1fr auto;
  gap: 0.25rem 1rem;
  margin-bottom: 0.5rem;
}

.disk-usage-bar {
  grid-column: 1 / -1;
  height: 4px;
  background: var(--void-border);
}

.disk-usage-fill {
  height: 100%;
  background: var(--cyan);
}

.disk-usage-updated {
  color: var(--text-muted);
  font-size: var(--text-xs);
}

/* === Sync, exports, permissions === */
.sync-status,
.transport-row,
.export-row {
  display: flex;
  align-items: center;
  gap: 0.75rem;
  padding: 0.5rem 0;
  border-bottom: 1px solid var(--void-border);
}

.transport-list,
.permissions-list {
  list-style: none;
}

.transport-label,
.export-text {
  flex: 1;
}

.export-text {
  display: flex;
  flex-direction: column;
}

.permissions-summary { color: var(--warning); }
.permissions-summary.ok { color: var(--moss-glow); }
.permission-status { margin-left: 1rem; color: var(--text-muted); }

.overview {
  display: grid;
  grid-template-columns: max-content 1fr;
  gap: 0.25rem 1.5rem;
}

.overview dt { color: var(--text-muted); }
"#;
