use std::io;
use std::path::{Path, PathBuf};

use aya::maps::{MapData, MapError, ProgramArray};
use aya::programs::xdp::XdpLinkId;
use aya::programs::{ProgramError, Xdp, XdpFlags};
use aya::{Bpf, BpfError};
use aya_log::BpfLogger;
use log::{debug, info, warn};

use tailcopy_common::{CLASSIFY_PROGRAM, REFLECT_PROGRAM, REFLECT_STAGE_KEY, STAGES_MAP};

use crate::cli::AttachArgs;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("failed to read eBPF object {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load eBPF object: {0}")]
    Load(#[from] BpfError),

    #[error("program {0:?} not found in eBPF object")]
    ProgramNotFound(&'static str),

    #[error("map {0:?} not found in eBPF object")]
    MapNotFound(&'static str),

    #[error("program {name:?}: {source}")]
    Program {
        name: &'static str,
        #[source]
        source: ProgramError,
    },

    #[error("failed to fill stage {key} of the stage table: {source}")]
    Stage {
        key: u32,
        #[source]
        source: MapError,
    },
}

/// The classifier attached to an interface, with the reflect stage
/// registered unless asked otherwise.
pub struct AttachedPipeline {
    bpf: Bpf,
    // The kernel empties a program array once its last user reference is
    // closed, so this lives as long as the attachment.
    _stages: Option<ProgramArray<MapData>>,
    link: Option<XdpLinkId>,
    iface: String,
}

impl AttachedPipeline {
    pub fn attach(args: &AttachArgs) -> Result<Self, LoaderError> {
        let mut bpf = load_object(&args.object)?;

        if let Err(e) = BpfLogger::init(&mut bpf) {
            // Happens when the object carries no log statements.
            warn!("failed to initialize eBPF logger: {}", e);
        }

        load_program(&mut bpf, REFLECT_PROGRAM)?;
        load_program(&mut bpf, CLASSIFY_PROGRAM)?;

        let stages = if args.leave_unregistered {
            info!("leaving stage {} empty", REFLECT_STAGE_KEY);
            None
        } else {
            Some(register_reflect(&mut bpf)?)
        };

        let flags = if args.skb_mode {
            XdpFlags::SKB_MODE
        } else {
            XdpFlags::default()
        };

        let link = xdp_mut(&mut bpf, CLASSIFY_PROGRAM)?
            .attach(&args.iface, flags)
            .map_err(|source| LoaderError::Program {
                name: CLASSIFY_PROGRAM,
                source,
            })?;
        info!("attached {} to {}", CLASSIFY_PROGRAM, args.iface);

        Ok(Self {
            bpf,
            _stages: stages,
            link: Some(link),
            iface: args.iface.clone(),
        })
    }

    pub fn detach(&mut self) -> Result<(), LoaderError> {
        let Some(link) = self.link.take() else {
            return Ok(());
        };

        xdp_mut(&mut self.bpf, CLASSIFY_PROGRAM)?
            .detach(link)
            .map_err(|source| LoaderError::Program {
                name: CLASSIFY_PROGRAM,
                source,
            })?;
        info!("detached {} from {}", CLASSIFY_PROGRAM, self.iface);

        Ok(())
    }
}

fn load_object(path: &Path) -> Result<Bpf, LoaderError> {
    let object = std::fs::read(path).map_err(|source| LoaderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", object.len(), path.display());

    Ok(Bpf::load(&object)?)
}

fn xdp_mut<'b>(bpf: &'b mut Bpf, name: &'static str) -> Result<&'b mut Xdp, LoaderError> {
    bpf.program_mut(name)
        .ok_or(LoaderError::ProgramNotFound(name))?
        .try_into()
        .map_err(|source| LoaderError::Program { name, source })
}

fn load_program(bpf: &mut Bpf, name: &'static str) -> Result<(), LoaderError> {
    xdp_mut(bpf, name)?
        .load()
        .map_err(|source| LoaderError::Program { name, source })?;
    debug!("loaded {}", name);

    Ok(())
}

fn register_reflect(bpf: &mut Bpf) -> Result<ProgramArray<MapData>, LoaderError> {
    let map = bpf
        .take_map(STAGES_MAP)
        .ok_or(LoaderError::MapNotFound(STAGES_MAP))?;
    let mut stages = ProgramArray::try_from(map).map_err(|source| LoaderError::Stage {
        key: REFLECT_STAGE_KEY,
        source,
    })?;

    let reflect: &Xdp = bpf
        .program(REFLECT_PROGRAM)
        .ok_or(LoaderError::ProgramNotFound(REFLECT_PROGRAM))?
        .try_into()
        .map_err(|source| LoaderError::Program {
            name: REFLECT_PROGRAM,
            source,
        })?;
    let fd = reflect.fd().map_err(|source| LoaderError::Program {
        name: REFLECT_PROGRAM,
        source,
    })?;

    stages
        .set(REFLECT_STAGE_KEY, fd, 0)
        .map_err(|source| LoaderError::Stage {
            key: REFLECT_STAGE_KEY,
            source,
        })?;
    info!("registered {} as stage {}", REFLECT_PROGRAM, REFLECT_STAGE_KEY);

    Ok(stages)
}

/// Lifts the locked memory limit for kernels that still charge maps
/// against it.
pub fn bump_memlock_rlimit() {
    let rlim = libc::rlimit {
        rlim_cur: libc::RLIM_INFINITY,
        rlim_max: libc::RLIM_INFINITY,
    };
    let ret = unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rlim) };
    if ret != 0 {
        debug!(
            "failed to remove limit on locked memory: {}",
            io::Error::last_os_error()
        );
    }
}
