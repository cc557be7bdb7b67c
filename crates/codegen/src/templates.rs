//! Literal TypeScript templates for every artifact kind.
//!
//! Templates are plain strings with `{{key}}` placeholders; there is no
//! template language beyond substitution.

use crate::context::{DatabaseKind, EntityName, OrmKind, ProjectContext};

/// Replace every `{{key}}` in `template` with its value.
///
/// One pass over the template: substituted values are never rescanned, and
/// placeholders with no matching key are kept verbatim.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn entity_vars(entity: &EntityName) -> [(&'static str, &str); 3] {
    [
        ("Name", entity.pascal()),
        ("name", entity.camel()),
        ("kebab", entity.kebab()),
    ]
}

const CONTROLLER: &str = r#"import { Request, Response, NextFunction } from "express";
import { {{Name}}Service } from "../services/{{Name}}Service";

export class {{Name}}Controller {
  constructor(private readonly service = new {{Name}}Service()) {}

  list = async (_req: Request, res: Response, next: NextFunction) => {
    try {
      res.json(await this.service.findAll());
    } catch (err) {
      next(err);
    }
  };

  get = async (req: Request, res: Response, next: NextFunction) => {
    try {
      const item = await this.service.findById(req.params.id);
      if (!item) {
        res.status(404).json({ message: "{{Name}} not found" });
        return;
      }
      res.json(item);
    } catch (err) {
      next(err);
    }
  };

  create = async (req: Request, res: Response, next: NextFunction) => {
    try {
      res.status(201).json(await this.service.create(req.body));
    } catch (err) {
      next(err);
    }
  };

  update = async (req: Request, res: Response, next: NextFunction) => {
    try {
      res.json(await this.service.update(req.params.id, req.body));
    } catch (err) {
      next(err);
    }
  };

  remove = async (req: Request, res: Response, next: NextFunction) => {
    try {
      await this.service.remove(req.params.id);
      res.status(204).send();
    } catch (err) {
      next(err);
    }
  };
}

export default {{Name}}Controller;
"#;

const SERVICE: &str = r#"import { {{Name}}Repository } from "../repositories/{{Name}}Repository";

export class {{Name}}Service {
  constructor(private readonly repository = new {{Name}}Repository()) {}

  findAll() {
    return this.repository.findAll();
  }

  findById(id: string) {
    return this.repository.findById(id);
  }

  create(data: Record<string, unknown>) {
    return this.repository.create(data);
  }

  update(id: string, data: Record<string, unknown>) {
    return this.repository.update(id, data);
  }

  remove(id: string) {
    return this.repository.remove(id);
  }
}

export default {{Name}}Service;
"#;

const MODEL_TYPEORM: &str = r#"import { Entity, PrimaryGeneratedColumn, Column, CreateDateColumn, UpdateDateColumn } from "typeorm";

@Entity({ name: "{{kebab}}" })
export class {{Name}} {
  @PrimaryGeneratedColumn("uuid")
  id!: string;

  @Column()
  name!: string;

  @CreateDateColumn()
  createdAt!: Date;

  @UpdateDateColumn()
  updatedAt!: Date;
}

export default {{Name}};
"#;

const MODEL_SEQUELIZE: &str = r#"import { DataTypes, Model } from "sequelize";
import { sequelize } from "../config/ormConfig";

export class {{Name}} extends Model {
  declare id: string;
  declare name: string;
}

{{Name}}.init(
  {
    id: { type: DataTypes.UUID, defaultValue: DataTypes.UUIDV4, primaryKey: true },
    name: { type: DataTypes.STRING, allowNull: false },
  },
  { sequelize, tableName: "{{kebab}}", timestamps: true },
);

export default {{Name}};
"#;

const MODEL_MONGOOSE: &str = r#"import { Schema, model, Document } from "mongoose";

export interface {{Name}}Document extends Document {
  name: string;
}

const {{name}}Schema = new Schema<{{Name}}Document>(
  {
    name: { type: String, required: true },
  },
  { timestamps: true },
);

export const {{Name}} = model<{{Name}}Document>("{{Name}}", {{name}}Schema);

export default {{Name}};
"#;

const MODEL_PRISMA: &str = r#"import type { Prisma } from "@prisma/client";

export interface {{Name}} {
  id: string;
  name: string;
  createdAt: Date;
  updatedAt: Date;
}

export type {{Name}}CreateInput = Prisma.{{Name}}CreateInput;
"#;

const REPOSITORY_TYPEORM: &str = r#"import { AppDataSource } from "../config/ormConfig";
import { {{Name}} } from "../models/{{Name}}";

export class {{Name}}Repository {
  private readonly repo = AppDataSource.getRepository({{Name}});

  findAll() {
    return this.repo.find();
  }

  findById(id: string) {
    return this.repo.findOneBy({ id });
  }

  create(data: Partial<{{Name}}>) {
    return this.repo.save(this.repo.create(data));
  }

  async update(id: string, data: Partial<{{Name}}>) {
    await this.repo.update(id, data);
    return this.findById(id);
  }

  async remove(id: string) {
    await this.repo.delete(id);
  }
}

export default {{Name}}Repository;
"#;

const REPOSITORY_SEQUELIZE: &str = r#"import { {{Name}} } from "../models/{{Name}}";

export class {{Name}}Repository {
  findAll() {
    return {{Name}}.findAll();
  }

  findById(id: string) {
    return {{Name}}.findByPk(id);
  }

  create(data: Record<string, unknown>) {
    return {{Name}}.create(data);
  }

  async update(id: string, data: Record<string, unknown>) {
    await {{Name}}.update(data, { where: { id } });
    return this.findById(id);
  }

  async remove(id: string) {
    await {{Name}}.destroy({ where: { id } });
  }
}

export default {{Name}}Repository;
"#;

const REPOSITORY_MONGOOSE: &str = r#"import { {{Name}} } from "../models/{{Name}}";

export class {{Name}}Repository {
  findAll() {
    return {{Name}}.find().exec();
  }

  findById(id: string) {
    return {{Name}}.findById(id).exec();
  }

  create(data: Record<string, unknown>) {
    return {{Name}}.create(data);
  }

  update(id: string, data: Record<string, unknown>) {
    return {{Name}}.findByIdAndUpdate(id, data, { new: true }).exec();
  }

  async remove(id: string) {
    await {{Name}}.findByIdAndDelete(id).exec();
  }
}

export default {{Name}}Repository;
"#;

const REPOSITORY_PRISMA: &str = r#"import { prisma } from "../config/ormConfig";

export class {{Name}}Repository {
  findAll() {
    return prisma.{{name}}.findMany();
  }

  findById(id: string) {
    return prisma.{{name}}.findUnique({ where: { id } });
  }

  create(data: any) {
    return prisma.{{name}}.create({ data });
  }

  update(id: string, data: any) {
    return prisma.{{name}}.update({ where: { id }, data });
  }

  async remove(id: string) {
    await prisma.{{name}}.delete({ where: { id } });
  }
}

export default {{Name}}Repository;
"#;

const MIDDLEWARE: &str = r#"import { Request, Response, NextFunction } from "express";

export function {{name}}Middleware(req: Request, _res: Response, next: NextFunction) {
  // {{Name}} middleware
  console.log(`[{{name}}] ${req.method} ${req.originalUrl}`);
  next();
}

export default {{name}}Middleware;
"#;

const VALIDATION: &str = r#"import { Request, Response, NextFunction } from "express";

export interface {{Name}}Payload {
  name: string;
}

export function validate{{Name}}(req: Request, res: Response, next: NextFunction) {
  const errors: string[] = [];
  const body = req.body as Partial<{{Name}}Payload>;

  if (typeof body.name !== "string" || body.name.trim().length === 0) {
    errors.push("name is required");
  }

  if (errors.length > 0) {
    res.status(400).json({ errors });
    return;
  }
  next();
}

export default validate{{Name}};
"#;

const ROUTE: &str = r#"import { Router } from "express";
import { {{Name}}Controller } from "../controllers/{{Name}}Controller";
import { validate{{Name}} } from "../validation/{{name}}Validation";

const router = Router();
const controller = new {{Name}}Controller();

router.get("/", controller.list);
router.get("/:id", controller.get);
router.post("/", validate{{Name}}, controller.create);
router.put("/:id", validate{{Name}}, controller.update);
router.delete("/:id", controller.remove);

export default router;
"#;

const APP_CONFIG: &str = r#"export const appConfig = {
  name: "{{project}}",
  port: {{port}},
  env: process.env.NODE_ENV ?? "development",
};

export default appConfig;
"#;

const DB_CONFIG: &str = r#"export const connectionString = process.env.DATABASE_URL ?? "{{url}}";

export const databaseConfig = {
  type: "{{scheme}}",
  host: process.env.DB_HOST ?? "localhost",
  port: Number(process.env.DB_PORT ?? {{db_port}}),
  database: "{{database}}",
  url: connectionString,
};

export default databaseConfig;
"#;

const ORM_TYPEORM: &str = r#"import "reflect-metadata";
import { DataSource } from "typeorm";

export const AppDataSource = new DataSource({
  type: "{{typeorm_type}}",
  url: {{url}},
  synchronize: process.env.NODE_ENV !== "production",
  entities: [__dirname + "/../models/*.{ts,js}"],
});

export async function connect() {
  await AppDataSource.initialize();
}
"#;

const ORM_SEQUELIZE: &str = r#"import { Sequelize } from "sequelize";

export const sequelize = new Sequelize({{url}}, { logging: false });

export async function connect() {
  await sequelize.authenticate();
}
"#;

const ORM_MONGOOSE: &str = r#"import mongoose from "mongoose";

export async function connect() {
  await mongoose.connect({{url}});
}
"#;

const ORM_PRISMA: &str = r#"import { PrismaClient } from "@prisma/client";

export const prisma = new PrismaClient({
  datasources: { db: { url: {{url}} } },
});

export async function connect() {
  await prisma.$connect();
}
"#;

const SERVER: &str = r#"import express from "express";
import { appConfig } from "./config/appConfig";
import { connect } from "./config/ormConfig";
{{imports}}
const app = express();
app.use(express.json());
{{mounts}}
app.get("/health", (_req, res) => {
  res.json({ status: "ok" });
});

connect()
  .then(() => {
    app.listen(appConfig.port, () => {
      console.log(`{{project}} listening on port ${appConfig.port}`);
    });
  })
  .catch((err) => {
    console.error("Failed to connect to the database", err);
    process.exit(1);
  });

export default app;
"#;

const ENV_EXAMPLE: &str = "NODE_ENV=development\nPORT={{port}}\nDATABASE_URL={{url}}\n";

/// `src/controllers/<Name>Controller.ts`
#[must_use]
pub fn controller(entity: &EntityName) -> String {
    render(CONTROLLER, &entity_vars(entity))
}

/// `src/services/<Name>Service.ts`
#[must_use]
pub fn service(entity: &EntityName) -> String {
    render(SERVICE, &entity_vars(entity))
}

/// `src/models/<Name>.ts`, shaped by the ORM.
#[must_use]
pub fn model(entity: &EntityName, orm: OrmKind) -> String {
    let template = match orm {
        OrmKind::TypeOrm => MODEL_TYPEORM,
        OrmKind::Sequelize => MODEL_SEQUELIZE,
        OrmKind::Mongoose => MODEL_MONGOOSE,
        OrmKind::Prisma => MODEL_PRISMA,
    };
    render(template, &entity_vars(entity))
}

/// `src/repositories/<Name>Repository.ts`, shaped by the ORM.
#[must_use]
pub fn repository(entity: &EntityName, orm: OrmKind) -> String {
    let template = match orm {
        OrmKind::TypeOrm => REPOSITORY_TYPEORM,
        OrmKind::Sequelize => REPOSITORY_SEQUELIZE,
        OrmKind::Mongoose => REPOSITORY_MONGOOSE,
        OrmKind::Prisma => REPOSITORY_PRISMA,
    };
    render(template, &entity_vars(entity))
}

/// `src/middleware/<name>Middleware.ts`
#[must_use]
pub fn middleware(entity: &EntityName) -> String {
    render(MIDDLEWARE, &entity_vars(entity))
}

/// `src/validation/<name>Validation.ts`
#[must_use]
pub fn validation(entity: &EntityName) -> String {
    render(VALIDATION, &entity_vars(entity))
}

/// `src/routes/<name>Routes.ts`
#[must_use]
pub fn route(entity: &EntityName) -> String {
    render(ROUTE, &entity_vars(entity))
}

/// `src/config/appConfig.ts`
#[must_use]
pub fn app_config(context: &ProjectContext) -> String {
    let port = context.port.to_string();
    render(
        APP_CONFIG,
        &[("project", context.project_name.as_str()), ("port", port.as_str())],
    )
}

/// `src/config/databaseConfig.ts` embedding `url`.
#[must_use]
pub fn db_config(context: &ProjectContext, url: &str) -> String {
    let db_port = context.database.default_port().to_string();
    let database = context.database_name();
    render(
        DB_CONFIG,
        &[
            ("url", url),
            ("scheme", context.database.scheme()),
            ("db_port", db_port.as_str()),
            ("database", database.as_str()),
        ],
    )
}

/// `src/config/ormConfig.ts`.
///
/// With a published connection string the URL is inlined; otherwise the file
/// reads `DATABASE_URL` at runtime.
#[must_use]
pub fn orm_config(context: &ProjectContext, connection: Option<&str>) -> String {
    let url = connection.map_or_else(
        || "process.env.DATABASE_URL".to_string(),
        |url| format!("\"{url}\""),
    );
    let typeorm_type = match context.database {
        DatabaseKind::MySql => "mysql",
        DatabaseKind::PostgreSql => "postgres",
        DatabaseKind::MongoDb => "mongodb",
        DatabaseKind::MsSql => "mssql",
    };
    let template = match context.orm {
        OrmKind::TypeOrm => ORM_TYPEORM,
        OrmKind::Sequelize => ORM_SEQUELIZE,
        OrmKind::Mongoose => ORM_MONGOOSE,
        OrmKind::Prisma => ORM_PRISMA,
    };
    render(template, &[("url", url.as_str()), ("typeorm_type", typeorm_type)])
}

/// `src/index.ts`, mounting one router per entity.
#[must_use]
pub fn server(context: &ProjectContext) -> String {
    let imports: String = context
        .entities
        .iter()
        .map(|e| format!("import {}Routes from \"./routes/{}Routes\";\n", e.camel(), e.camel()))
        .collect();
    let mounts: String = context
        .entities
        .iter()
        .map(|e| format!("app.use(\"/api/{}\", {}Routes);\n", e.kebab(), e.camel()))
        .collect();
    render(
        SERVER,
        &[
            ("imports", imports.as_str()),
            ("mounts", mounts.as_str()),
            ("project", context.project_name.as_str()),
        ],
    )
}

/// `.env.example`
#[must_use]
pub fn env_example(context: &ProjectContext) -> String {
    let port = context.port.to_string();
    let url = context.database.connection_url(&context.database_name());
    render(ENV_EXAMPLE, &[("port", port.as_str()), ("url", url.as_str())])
}
