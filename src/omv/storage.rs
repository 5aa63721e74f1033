//! Storage snapshot: filesystems, SMART disks, RAID arrays and block devices.
//!
//! The four collections are fetched independently and joined once, when the
//! snapshot is built, on their device-file strings:
//!
//! - a filesystem whose `devicefile` matches a RAID array's `devicefile` is
//!   [`VolumeBacking::RaidBacked`]; each array member has its partition
//!   number stripped (`/dev/sda1` → `/dev/sda`) and is matched to a SMART disk.
//! - any other filesystem is [`VolumeBacking::DirectDisk`], joined to a SMART
//!   disk by its `parentdevicefile`.
//!
//! Size, usage and temperature figures are only reported for mounted volumes.

use crate::error::Result;
use crate::omv::format::{bytes_to_readable, round1};
use crate::omv::types::{records, DiskDevice, Filesystem, RaidDevice, SmartDevice};
use serde_json::{json, Value};

/// How a volume maps onto physical disks. Indices point into the snapshot's
/// `raids` and `smart` collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeBacking {
    RaidBacked {
        raid: usize,
        members: Vec<Option<usize>>,
    },
    DirectDisk {
        disk: Option<usize>,
    },
}

#[derive(Debug, Clone)]
pub struct Volume {
    pub filesystem: Filesystem,
    pub backing: VolumeBacking,
}

impl Volume {
    pub fn devicefile(&self) -> &str {
        &self.filesystem.devicefile
    }

    pub fn is_mounted(&self) -> bool {
        self.filesystem.mounted
    }

    /// `size - available`, only for mounted volumes.
    pub fn size_used(&self) -> Option<i64> {
        self.is_mounted()
            .then(|| self.filesystem.size - self.filesystem.available)
    }

    pub fn size_total(&self) -> Option<i64> {
        self.is_mounted().then_some(self.filesystem.size)
    }

    /// Used share in percent, one decimal. Absent unless both used and total
    /// are positive.
    pub fn percentage_used(&self) -> Option<f64> {
        let total = self.size_total()?;
        let used = self.size_used()?;
        if used <= 0 || total <= 0 {
            return None;
        }
        Some(round1(used as f64 / total as f64 * 100.0))
    }
}

/// Strip the trailing partition-number character of a member device file.
pub fn strip_partition(devicefile: &str) -> &str {
    let mut chars = devicefile.chars();
    chars.next_back();
    chars.as_str()
}

/// Parse a SMART temperature such as `"35°C"` or `"35 C"`. Unparseable or
/// missing readings are `None`.
pub fn parse_temperature(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim_end_matches(|c: char| !c.is_ascii_digit())
            .trim()
            .parse()
            .ok(),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Storage {
    raw: Value,
    volumes: Vec<Volume>,
    smart: Vec<SmartDevice>,
    raids: Vec<RaidDevice>,
    disks: Vec<DiskDevice>,
}

impl Storage {
    /// Build the snapshot from the four raw RPC payloads and resolve every
    /// volume's backing.
    pub fn from_collections(volumes: Value, smart: Value, raid: Value, disk: Value) -> Result<Self> {
        let filesystems: Vec<Filesystem> = records(&volumes)?;
        let smart_devices: Vec<SmartDevice> = records(&smart)?;
        let raids: Vec<RaidDevice> = records(&raid)?;
        let disks: Vec<DiskDevice> = records(&disk)?;

        let find_disk = |devicefile: &str| {
            smart_devices
                .iter()
                .position(|d| d.devicefile == devicefile)
        };

        let resolved = filesystems
            .into_iter()
            .map(|filesystem| {
                let backing = match raids
                    .iter()
                    .position(|r| r.devicefile == filesystem.devicefile)
                {
                    Some(raid) => VolumeBacking::RaidBacked {
                        raid,
                        members: raids[raid]
                            .devices
                            .iter()
                            .map(|member| find_disk(strip_partition(member)))
                            .collect(),
                    },
                    None => VolumeBacking::DirectDisk {
                        disk: filesystem.parentdevicefile.as_deref().and_then(find_disk),
                    },
                };
                Volume {
                    filesystem,
                    backing,
                }
            })
            .collect();

        Ok(Self {
            raw: json!({
                "volumes": volumes,
                "smart": smart,
                "raid": raid,
                "disk": disk,
            }),
            volumes: resolved,
            smart: smart_devices,
            raids,
            disks,
        })
    }

    /// The four raw collections as received.
    pub fn detailed_storage(&self) -> &Value {
        &self.raw
    }

    pub fn volumes(&self) -> Vec<&str> {
        self.volumes.iter().map(Volume::devicefile).collect()
    }

    pub fn volume(&self, devicefile: &str) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.devicefile() == devicefile)
    }

    fn volume_raid(&self, devicefile: &str) -> Option<&RaidDevice> {
        match &self.volume(devicefile)?.backing {
            VolumeBacking::RaidBacked { raid, .. } => self.raids.get(*raid),
            VolumeBacking::DirectDisk { .. } => None,
        }
    }

    /// RAID state (e.g. `clean`) of a RAID-backed volume.
    pub fn volume_status(&self, devicefile: &str) -> Option<&str> {
        self.volume_raid(devicefile)?.state.as_deref()
    }

    /// RAID level (e.g. `raid1`) of a RAID-backed volume.
    pub fn volume_device_type(&self, devicefile: &str) -> Option<&str> {
        self.volume_raid(devicefile)?.level.as_deref()
    }

    pub fn volume_mounted(&self, devicefile: &str) -> bool {
        self.volume(devicefile).is_some_and(Volume::is_mounted)
    }

    pub fn volume_size_total(&self, devicefile: &str) -> Option<i64> {
        self.volume(devicefile)?.size_total()
    }

    pub fn volume_size_total_readable(&self, devicefile: &str) -> Option<String> {
        self.volume_size_total(devicefile).map(|bytes| bytes_to_readable(bytes))
    }

    pub fn volume_size_used(&self, devicefile: &str) -> Option<i64> {
        self.volume(devicefile)?.size_used()
    }

    pub fn volume_size_used_readable(&self, devicefile: &str) -> Option<String> {
        self.volume_size_used(devicefile).map(|bytes| bytes_to_readable(bytes))
    }

    pub fn volume_percentage_used(&self, devicefile: &str) -> Option<f64> {
        self.volume(devicefile)?.percentage_used()
    }

    fn smart_temp(&self, index: Option<usize>) -> Option<i64> {
        parse_temperature(&self.smart.get(index?)?.temperature)
    }

    /// Average temperature of the disks under a mounted volume.
    ///
    /// RAID members without a readable temperature are left out of both sum
    /// and count; the mean is rounded half-to-even.
    pub fn volume_disk_temp_avg(&self, devicefile: &str) -> Option<i64> {
        let volume = self.volume(devicefile).filter(|v| v.is_mounted())?;
        match &volume.backing {
            VolumeBacking::DirectDisk { disk } => self.smart_temp(*disk),
            VolumeBacking::RaidBacked { members, .. } => {
                let temps: Vec<i64> = members.iter().filter_map(|m| self.smart_temp(*m)).collect();
                let total: i64 = temps.iter().sum();
                if total > 0 && !temps.is_empty() {
                    Some((total as f64 / temps.len() as f64).round_ties_even() as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Highest temperature of the disks under a mounted volume.
    ///
    /// For RAID-backed volumes the running maximum starts at 0, so a set of
    /// members with no readable temperature reports 0.
    pub fn volume_disk_temp_max(&self, devicefile: &str) -> Option<i64> {
        let volume = self.volume(devicefile).filter(|v| v.is_mounted())?;
        match &volume.backing {
            VolumeBacking::DirectDisk { disk } => self.smart_temp(*disk),
            VolumeBacking::RaidBacked { members, .. } => Some(
                members
                    .iter()
                    .filter_map(|m| self.smart_temp(*m))
                    .fold(0, |max, t| if t > max { t } else { max }),
            ),
        }
    }

    pub fn raids(&self) -> Vec<&str> {
        self.raids.iter().map(|r| r.devicefile.as_str()).collect()
    }

    pub fn raid(&self, devicefile: &str) -> Option<&RaidDevice> {
        self.raids.iter().find(|r| r.devicefile == devicefile)
    }

    pub fn raid_name(&self, devicefile: &str) -> Option<&str> {
        Some(self.raid(devicefile)?.name.as_str())
    }

    pub fn raid_devices(&self, devicefile: &str) -> Option<&[String]> {
        Some(self.raid(devicefile)?.devices.as_slice())
    }

    /// The array a disk belongs to, matching members with their partition
    /// number stripped.
    pub fn raid_of_disk(&self, disk_devicefile: &str) -> Option<&str> {
        self.raids
            .iter()
            .find(|r| {
                r.devices
                    .iter()
                    .any(|member| strip_partition(member) == disk_devicefile)
            })
            .map(|r| r.devicefile.as_str())
    }

    /// SMART-monitored disks.
    pub fn disks(&self) -> Vec<&str> {
        self.smart.iter().map(|d| d.devicefile.as_str()).collect()
    }

    pub fn disk(&self, devicefile: &str) -> Option<&SmartDevice> {
        self.smart.iter().find(|d| d.devicefile == devicefile)
    }

    pub fn disk_name(&self, devicefile: &str) -> Option<&str> {
        self.disk(devicefile)?.model.as_deref()
    }

    pub fn disk_smart_status(&self, devicefile: &str) -> Option<&str> {
        self.disk(devicefile)?.overallstatus.as_deref()
    }

    pub fn disk_temp(&self, devicefile: &str) -> Option<i64> {
        parse_temperature(&self.disk(devicefile)?.temperature)
    }

    /// Every block device from `DiskMgmt`, SMART-capable or not.
    pub fn block_devices(&self) -> &[DiskDevice] {
        &self.disks
    }
}
