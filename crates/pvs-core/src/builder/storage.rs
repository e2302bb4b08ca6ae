// ── Storage passes: storage classes, volumes ──

use tracing::debug;

use pvs_api::{RecordSource, StorageType, Volume};

use crate::convert::{gigabytes_to_bytes, parse_datetime};
use crate::model::{CloudVolume, CloudVolumeType, EntityId, Reference};
use crate::store::StagingStore;

const VOLUME_DESCRIPTION: &str = "IBM Cloud Block-Storage Volume";
const ACTIVE: &str = "active";

pub(crate) fn cloud_volume_types(
    source: &dyn RecordSource,
    store: &StagingStore,
) -> Result<usize, pvs_api::Error> {
    let mut registered = 0;
    for storage_type in source.storage_types()? {
        match build_cloud_volume_type(&storage_type) {
            Some(volume_type) => {
                store.register(volume_type);
                registered += 1;
            }
            None => debug!(
                storage_type = %storage_type.storage_type,
                state = ?storage_type.state,
                "skipping inactive storage type"
            ),
        }
    }
    Ok(registered)
}

/// `None` for any tier whose state is not exactly `active`.
pub(crate) fn build_cloud_volume_type(storage_type: &StorageType) -> Option<CloudVolumeType> {
    if storage_type.state.as_deref() != Some(ACTIVE) {
        return None;
    }
    Some(CloudVolumeType {
        ems_ref: EntityId::from(storage_type.storage_type.as_str()),
        name: storage_type.storage_type.clone(),
        description: storage_type.description.clone(),
    })
}

pub(crate) fn volumes(
    source: &dyn RecordSource,
    store: &StagingStore,
    zone: &Reference,
) -> Result<usize, pvs_api::Error> {
    let volumes = source.volumes()?;
    for volume in &volumes {
        store.register(build_cloud_volume(volume, zone));
    }
    Ok(volumes.len())
}

pub(crate) fn build_cloud_volume(volume: &Volume, zone: &Reference) -> CloudVolume {
    CloudVolume {
        ems_ref: EntityId::from(volume.volume_id.as_str()),
        name: volume.name.clone(),
        status: volume.state.clone(),
        bootable: volume.bootable,
        creation_time: parse_datetime(volume.creation_date.as_deref()),
        description: VOLUME_DESCRIPTION.into(),
        volume_type: volume.disk_type.clone(),
        size: volume.size.map(gigabytes_to_bytes),
        multi_attachment: volume.shareable,
        availability_zone: zone.clone(),
    }
}
