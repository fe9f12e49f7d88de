// Host fingerprint - normalized system attributes and their content hash

use serde::Serialize;
use sha2::{Digest, Sha256};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use tracing::warn;

/// Marker for attributes the host probe could not supply.
pub const UNKNOWN: &str = "unknown";

/// Normalized OS attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsInfo {
    pub distro: String,
    pub kernel: String,
    pub arch: String,
    pub platform: String,
    pub release: String,
}

/// Normalized CPU attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuInfo {
    pub manufacturer: String,
    pub brand: String,
    pub cores: String,
    pub cache: String,
    pub speed: String,
}

/// Normalized host attributes used to group reports by machine class.
///
/// Every field is present in the serialized form; attributes the probe could
/// not supply hold the explicit [`UNKNOWN`] marker rather than being omitted.
/// Field order is fixed by declaration, so the serde_json serialization is
/// canonical and [`SystemFingerprint::content_hash`] is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemFingerprint {
    pub os: OsInfo,
    pub cpu: CpuInfo,
    /// Total physical memory in bytes, or [`UNKNOWN`].
    pub memory: String,
}

/// Raw OS probe output; any attribute may be missing.
#[derive(Debug, Clone, Default)]
pub struct OsProbe {
    pub distro: Option<String>,
    pub kernel: Option<String>,
    pub arch: Option<String>,
    pub platform: Option<String>,
    pub release: Option<String>,
}

/// Raw CPU probe output; any attribute may be missing.
#[derive(Debug, Clone, Default)]
pub struct CpuProbe {
    pub manufacturer: Option<String>,
    pub brand: Option<String>,
    pub cores: Option<usize>,
    pub cache: Option<String>,
    pub speed_mhz: Option<u64>,
}

fn or_unknown(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN.to_string(),
    }
}

impl SystemFingerprint {
    /// Fold raw probe output into the normalized shape. Missing attributes
    /// resolve to the explicit unknown marker, never to an omitted field.
    pub fn normalize(os: OsProbe, cpu: CpuProbe, memory_bytes: Option<u64>) -> Self {
        Self {
            os: OsInfo {
                distro: or_unknown(os.distro),
                kernel: or_unknown(os.kernel),
                arch: or_unknown(os.arch),
                platform: or_unknown(os.platform),
                release: or_unknown(os.release),
            },
            cpu: CpuInfo {
                manufacturer: or_unknown(cpu.manufacturer),
                brand: or_unknown(cpu.brand),
                cores: or_unknown(cpu.cores.map(|c| c.to_string())),
                cache: or_unknown(cpu.cache),
                speed: or_unknown(cpu.speed_mhz.map(|s| s.to_string())),
            },
            memory: or_unknown(memory_bytes.map(|m| m.to_string())),
        }
    }

    /// All attributes unknown. Used when the host probe fails outright.
    pub fn all_unknown() -> Self {
        Self::normalize(OsProbe::default(), CpuProbe::default(), None)
    }

    /// Stable lowercase-hex SHA-256 digest over the canonical JSON
    /// serialization. Hosts with identical normalized attributes collide
    /// deterministically, which is what groups their reports together.
    pub fn content_hash(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        let digest: [u8; 32] = hasher.finalize().into();
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

fn probe_os() -> OsProbe {
    OsProbe {
        distro: System::name(),
        kernel: System::kernel_version(),
        arch: Some(std::env::consts::ARCH.to_string()),
        platform: Some(std::env::consts::OS.to_string()),
        release: System::os_version(),
    }
}

fn probe_cpu() -> CpuProbe {
    let sys = System::new_with_specifics(
        RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
    );
    let first = sys.cpus().first();

    CpuProbe {
        manufacturer: first.map(|c| c.vendor_id().to_string()),
        brand: first.map(|c| c.brand().to_string()),
        cores: Some(sys.cpus().len()).filter(|n| *n > 0),
        // sysinfo does not expose cache topology
        cache: None,
        speed_mhz: first.map(|c| c.frequency()).filter(|f| *f > 0),
    }
}

fn probe_memory() -> Option<u64> {
    let sys = System::new_with_specifics(
        RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
    );
    Some(sys.total_memory()).filter(|m| *m > 0)
}

/// Query OS, CPU and memory attributes concurrently and join the results
/// into a normalized fingerprint.
///
/// The three queries are independent reads with no interaction; completion
/// order is irrelevant, the results recombine into fixed fields. A failed
/// query degrades its section to unknown markers instead of failing the
/// report.
pub async fn probe() -> SystemFingerprint {
    let os = tokio::task::spawn_blocking(probe_os);
    let cpu = tokio::task::spawn_blocking(probe_cpu);
    let memory = tokio::task::spawn_blocking(probe_memory);

    let (os, cpu, memory) = tokio::join!(os, cpu, memory);

    let os = os.unwrap_or_else(|e| {
        warn!("OS probe failed, falling back to unknown: {}", e);
        OsProbe::default()
    });
    let cpu = cpu.unwrap_or_else(|e| {
        warn!("CPU probe failed, falling back to unknown: {}", e);
        CpuProbe::default()
    });
    let memory = memory.unwrap_or_else(|e| {
        warn!("memory probe failed, falling back to unknown: {}", e);
        None
    });

    SystemFingerprint::normalize(os, cpu, memory)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_probe() -> (OsProbe, CpuProbe, Option<u64>) {
        (
            OsProbe {
                distro: Some("Ubuntu".into()),
                kernel: Some("6.8.0".into()),
                arch: Some("x86_64".into()),
                platform: Some("linux".into()),
                release: Some("24.04".into()),
            },
            CpuProbe {
                manufacturer: Some("GenuineIntel".into()),
                brand: Some("Intel(R) Xeon(R)".into()),
                cores: Some(8),
                cache: None,
                speed_mhz: Some(2400),
            },
            Some(16 << 30),
        )
    }

    #[test]
    fn test_normalize_fills_unknown() {
        let fp = SystemFingerprint::normalize(
            OsProbe {
                distro: Some("Ubuntu".into()),
                ..Default::default()
            },
            CpuProbe::default(),
            None,
        );
        assert_eq!(fp.os.distro, "Ubuntu");
        assert_eq!(fp.os.kernel, UNKNOWN);
        assert_eq!(fp.os.arch, UNKNOWN);
        assert_eq!(fp.os.platform, UNKNOWN);
        assert_eq!(fp.os.release, UNKNOWN);
        assert_eq!(fp.cpu.manufacturer, UNKNOWN);
        assert_eq!(fp.cpu.cores, UNKNOWN);
        assert_eq!(fp.memory, UNKNOWN);
    }

    #[test]
    fn test_normalize_empty_string_is_unknown() {
        let fp = SystemFingerprint::normalize(
            OsProbe {
                kernel: Some(String::new()),
                ..Default::default()
            },
            CpuProbe::default(),
            None,
        );
        assert_eq!(fp.os.kernel, UNKNOWN);
    }

    #[test]
    fn test_serialization_never_omits_fields() {
        let fp = SystemFingerprint::all_unknown();
        let json = serde_json::to_value(&fp).expect("serialize fingerprint");
        for field in ["distro", "kernel", "arch", "platform", "release"] {
            assert_eq!(json["os"][field], UNKNOWN, "os.{} missing", field);
        }
        for field in ["manufacturer", "brand", "cores", "cache", "speed"] {
            assert_eq!(json["cpu"][field], UNKNOWN, "cpu.{} missing", field);
        }
        assert_eq!(json["memory"], UNKNOWN);
    }

    #[test]
    fn test_hash_deterministic() {
        let (os, cpu, mem) = sample_probe();
        let a = SystemFingerprint::normalize(os.clone(), cpu.clone(), mem);
        let b = SystemFingerprint::normalize(os, cpu, mem);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 64);
    }

    #[test]
    fn test_hash_sensitive_to_single_field() {
        let (os, cpu, mem) = sample_probe();
        let base = SystemFingerprint::normalize(os.clone(), cpu.clone(), mem);

        let mut changed_os = os.clone();
        changed_os.kernel = Some("6.9.1".into());
        let changed = SystemFingerprint::normalize(changed_os, cpu.clone(), mem);
        assert_ne!(base.content_hash(), changed.content_hash());

        let mut changed_cpu = cpu;
        changed_cpu.cores = Some(16);
        let changed = SystemFingerprint::normalize(os, changed_cpu, mem);
        assert_ne!(base.content_hash(), changed.content_hash());
    }

    #[tokio::test]
    async fn test_probe_produces_fully_populated_shape() {
        let fp = probe().await;
        // Whatever the host looks like, no field may be empty.
        let json = serde_json::to_value(&fp).expect("serialize fingerprint");
        assert!(json["os"]["platform"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(json["memory"].as_str().is_some_and(|s| !s.is_empty()));
    }
}
